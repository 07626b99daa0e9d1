//! Income tracking: dashboard + pipe-format income entries.

use async_trait::async_trait;
use regex::Regex;

use crate::{
    dispatch::{CommandInput, DispatchContext, Feature, Reply},
    formatting::escape_html,
    Result,
};

/// `/money` — financial dashboard.
pub struct MoneyDashboard;

#[async_trait]
impl Feature for MoneyDashboard {
    async fn handle(&self, _input: &CommandInput, ctx: &DispatchContext) -> Result<Reply> {
        Ok(Reply::html(format!(
            "💰 <b>Financial Dashboard</b>\n\n\
             📊 <b>This Month:</b>\n\
             • Target: €{:.0}\n\
             • Log your income to see progress\n\n\
             <b>Commands:</b>\n\
             • /income - Log income entry",
            ctx.cfg.monthly_income_target
        )))
    }
}

/// `/income cat | gross | bills | description` — parse and echo the entry.
pub struct IncomeLog;

#[async_trait]
impl Feature for IncomeLog {
    async fn handle(&self, input: &CommandInput, ctx: &DispatchContext) -> Result<Reply> {
        let args = input.args.trim();
        if args.is_empty() {
            return Ok(usage_reply());
        }

        let Some(entry) = parse_income_line(args) else {
            let mut reply = usage_reply();
            reply.ok = false;
            return Ok(reply);
        };

        let net = entry.gross - entry.bills;
        let target = ctx.cfg.monthly_income_target;
        let pct = if target > 0.0 {
            (net / target * 100.0).clamp(0.0, 999.0)
        } else {
            0.0
        };

        Ok(Reply::html(format!(
            "💰 <b>Income logged</b>\n\n\
             Category: {}\n\
             Gross: €{:.2}\n\
             Bills: €{:.2}\n\
             <b>Net: €{:.2}</b> ({:.0}% of €{:.0} target)\n\n\
             {}",
            escape_html(&entry.category),
            entry.gross,
            entry.bills,
            net,
            pct,
            target,
            escape_html(&entry.description),
        )))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IncomeEntry {
    pub category: String,
    pub gross: f64,
    pub bills: f64,
    pub description: String,
}

/// Parse `category | gross | bills | description`.
///
/// Amounts accept `1234.56` and `1234,56`; the description may contain
/// anything, including more pipes.
pub fn parse_income_line(line: &str) -> Option<IncomeEntry> {
    let re = Regex::new(
        r"^\s*([^|]+?)\s*\|\s*([0-9]+(?:[.,][0-9]+)?)\s*\|\s*([0-9]+(?:[.,][0-9]+)?)\s*\|\s*(.+?)\s*$",
    )
    .expect("valid regex");

    let caps = re.captures(line)?;
    let gross = parse_amount(&caps[2])?;
    let bills = parse_amount(&caps[3])?;

    Some(IncomeEntry {
        category: caps[1].to_string(),
        gross,
        bills,
        description: caps[4].to_string(),
    })
}

fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', ".").parse::<f64>().ok()
}

fn usage_reply() -> Reply {
    Reply::html(
        "💰 <b>Log Income</b>\n\n\
         Format: Category | Gross | Bills | Description\n\
         Example: <code>personal | 2000 | 800 | VA disability</code>\n\n\
         Categories: personal, blokblok"
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::{test_config, Mode},
        domain::{ChatId, UserId},
    };

    fn ctx() -> DispatchContext {
        DispatchContext {
            cfg: Arc::new(test_config(Mode::Mock)),
            chat_id: ChatId(1),
            user_id: UserId(1),
        }
    }

    #[test]
    fn parses_the_documented_example() {
        let entry = parse_income_line("personal | 2000 | 800 | VA disability").unwrap();
        assert_eq!(entry.category, "personal");
        assert_eq!(entry.gross, 2000.0);
        assert_eq!(entry.bills, 800.0);
        assert_eq!(entry.description, "VA disability");
    }

    #[test]
    fn parses_decimal_commas_and_keeps_pipes_in_description() {
        let entry = parse_income_line("blokblok|1234,50| 0 | invoice #7 | rush job").unwrap();
        assert_eq!(entry.gross, 1234.5);
        assert_eq!(entry.bills, 0.0);
        assert_eq!(entry.description, "invoice #7 | rush job");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_income_line("just some text").is_none());
        assert!(parse_income_line("cat | notanumber | 0 | x").is_none());
        assert!(parse_income_line("cat | 100 | 50").is_none());
    }

    #[tokio::test]
    async fn income_reply_contains_net_amount() {
        let reply = IncomeLog
            .handle(&CommandInput::text("personal | 2000 | 800 | VA"), &ctx())
            .await
            .unwrap();
        assert!(reply.ok);
        assert!(reply.html.contains("Net: €1200.00"));
    }

    #[tokio::test]
    async fn malformed_income_is_a_usage_failure_not_a_fault() {
        let reply = IncomeLog
            .handle(&CommandInput::text("garbage"), &ctx())
            .await
            .unwrap();
        assert!(!reply.ok);
        assert!(reply.html.contains("Format:"));
    }

    #[tokio::test]
    async fn dashboard_shows_target() {
        let reply = MoneyDashboard
            .handle(&CommandInput::default(), &ctx())
            .await
            .unwrap();
        assert!(reply.html.contains("€5363"));
    }
}

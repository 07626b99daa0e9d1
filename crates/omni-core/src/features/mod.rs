//! Feature handlers, one module per command family.

use std::sync::Arc;

use crate::{dispatch::CommandRouter, render::RenderApi, Result};

pub mod extras;
pub mod help;
pub mod leads;
pub mod meal;
pub mod meal_data;
pub mod money;
pub mod video;

/// Build the command table.
///
/// Runs once at startup, before the receive loop; a duplicate name here is a
/// programming error and aborts startup.
pub fn build_router(render: Arc<dyn RenderApi>) -> Result<CommandRouter> {
    let mut router = CommandRouter::new();

    let help = Arc::new(help::HelpFeature);
    router.register("start", help.clone())?;
    router.register("help", help)?;

    router.register("video", Arc::new(video::VideoFeature::new(render)))?;

    let meal = Arc::new(meal::MealFeature);
    router.register("dinner", meal.clone())?;
    router.register("meal", meal)?;

    router.register("money", Arc::new(money::MoneyDashboard))?;
    router.register("income", Arc::new(money::IncomeLog))?;

    router.register("leads", Arc::new(leads::LeadsFeature))?;

    router.register("memory", Arc::new(extras::MemoryFeature))?;
    router.register("calendar", Arc::new(extras::CalendarFeature))?;
    router.register("trade", Arc::new(extras::TradeFeature))?;

    Ok(router)
}

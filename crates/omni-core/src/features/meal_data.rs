//! Built-in recipe set for the meal feature.

pub struct Recipe {
    pub name: &'static str,
    pub category: &'static str,
    pub cuisine: &'static str,
    pub ingredients: &'static [&'static str],
    pub time_min: u32,
    pub cost_eur: u32,
    pub description: &'static str,
}

pub const RECIPES: &[Recipe] = &[
    Recipe {
        name: "Spaghetti Carbonara",
        category: "Italian Classics",
        cuisine: "Italian",
        ingredients: &[
            "400g spaghetti",
            "200g guanciale",
            "4 eggs",
            "100g Pecorino",
            "Black pepper",
        ],
        time_min: 25,
        cost_eur: 8,
        description: "Classic Roman pasta with eggs, cheese, and cured pork",
    },
    Recipe {
        name: "Chicken Tikka Masala",
        category: "Asian Favorites",
        cuisine: "Indian",
        ingredients: &[
            "500g chicken",
            "Yogurt",
            "Tomato sauce",
            "Garam masala",
            "Cream",
            "Rice",
        ],
        time_min: 40,
        cost_eur: 10,
        description: "Creamy, spiced curry with tender chicken",
    },
    Recipe {
        name: "Pad Thai",
        category: "Asian Favorites",
        cuisine: "Thai",
        ingredients: &[
            "Rice noodles",
            "Shrimp or chicken",
            "Eggs",
            "Bean sprouts",
            "Peanuts",
            "Tamarind",
        ],
        time_min: 30,
        cost_eur: 9,
        description: "Stir-fried noodles with sweet-sour-savory sauce",
    },
    Recipe {
        name: "Margherita Pizza",
        category: "Italian Classics",
        cuisine: "Italian",
        ingredients: &[
            "Pizza dough",
            "San Marzano tomatoes",
            "Mozzarella",
            "Fresh basil",
            "Olive oil",
        ],
        time_min: 35,
        cost_eur: 7,
        description: "Simple, classic Neapolitan pizza",
    },
    Recipe {
        name: "Beef Stir Fry",
        category: "Quick & Easy",
        cuisine: "Asian",
        ingredients: &[
            "300g beef strips",
            "Broccoli",
            "Soy sauce",
            "Ginger",
            "Garlic",
            "Rice",
        ],
        time_min: 20,
        cost_eur: 12,
        description: "Fast, flavorful weeknight dinner",
    },
    Recipe {
        name: "Risotto ai Funghi",
        category: "Italian Classics",
        cuisine: "Italian",
        ingredients: &[
            "Arborio rice",
            "Mixed mushrooms",
            "White wine",
            "Parmesan",
            "Butter",
            "Stock",
        ],
        time_min: 35,
        cost_eur: 11,
        description: "Creamy rice with earthy mushrooms",
    },
];

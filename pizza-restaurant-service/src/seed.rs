use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use crate::repository::Repository;

const RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// (price, restaurant index, pizza index)
const RESTAURANT_PIZZAS: [(i32, usize, usize); 3] = [(1, 0, 0), (4, 1, 1), (5, 2, 2)];

#[derive(Debug)]
pub struct Seeded {
    pub restaurants: Vec<Restaurant>,
    pub pizzas: Vec<Pizza>,
    pub restaurant_pizzas: Vec<RestaurantPizza>,
}

/// Replaces everything in the database with the demo data set.
pub fn seed(conn: &mut SqliteConnection) -> QueryResult<Seeded> {
    let seeded = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let mut repo = Repository::new(conn);
        repo.clear()?;

        let restaurants = RESTAURANTS
            .iter()
            .map(|&(name, address)| repo.insert_restaurant(&NewRestaurant { name, address }))
            .collect::<QueryResult<Vec<_>>>()?;
        let pizzas = PIZZAS
            .iter()
            .map(|&(name, ingredients)| repo.insert_pizza(&NewPizza { name, ingredients }))
            .collect::<QueryResult<Vec<_>>>()?;
        let restaurant_pizzas = RESTAURANT_PIZZAS
            .iter()
            .map(|&(price, r, p)| {
                repo.insert_restaurant_pizza(&NewRestaurantPizza {
                    price,
                    restaurant_id: restaurants[r].id,
                    pizza_id: pizzas[p].id,
                })
            })
            .collect::<QueryResult<Vec<_>>>()?;

        Ok(Seeded {
            restaurants,
            pizzas,
            restaurant_pizzas,
        })
    })?;

    info!(
        restaurants = seeded.restaurants.len(),
        pizzas = seeded.pizzas.len(),
        restaurant_pizzas = seeded.restaurant_pizzas.len(),
        "seeded database"
    );
    Ok(seeded)
}

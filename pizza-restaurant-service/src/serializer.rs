use serde::Serialize;
use utoipa::ToSchema;

use crate::models;

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: i32,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Pizza {
    pub id: i32,
    pub name: String,
    pub ingredients: String,
}

/// An association as nested under its restaurant.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantDetails {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<RestaurantPizza>,
}

/// A newly created association with both of its parents.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedRestaurantPizza {
    pub id: i32,
    pub price: i32,
    pub pizza_id: i32,
    pub restaurant_id: i32,
    pub pizza: Pizza,
    pub restaurant: RestaurantSummary,
}

pub fn serialize_restaurant_summary(restaurant: &models::Restaurant) -> RestaurantSummary {
    RestaurantSummary {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
    }
}

pub fn serialize_pizza(pizza: &models::Pizza) -> Pizza {
    Pizza {
        id: pizza.id,
        name: pizza.name.clone(),
        ingredients: pizza.ingredients.clone(),
    }
}

pub fn serialize_restaurant_details(
    restaurant: &models::Restaurant,
    restaurant_pizzas: &[(models::RestaurantPizza, models::Pizza)],
) -> RestaurantDetails {
    RestaurantDetails {
        id: restaurant.id,
        name: restaurant.name.clone(),
        address: restaurant.address.clone(),
        restaurant_pizzas: restaurant_pizzas
            .iter()
            .map(|(rp, pizza)| RestaurantPizza {
                id: rp.id,
                price: rp.price,
                pizza_id: rp.pizza_id,
                restaurant_id: rp.restaurant_id,
                pizza: serialize_pizza(pizza),
            })
            .collect(),
    }
}

pub fn serialize_created_restaurant_pizza(
    restaurant_pizza: &models::RestaurantPizza,
    pizza: &models::Pizza,
    restaurant: &models::Restaurant,
) -> CreatedRestaurantPizza {
    CreatedRestaurantPizza {
        id: restaurant_pizza.id,
        price: restaurant_pizza.price,
        pizza_id: restaurant_pizza.pizza_id,
        restaurant_id: restaurant_pizza.restaurant_id,
        pizza: serialize_pizza(pizza),
        restaurant: serialize_restaurant_summary(restaurant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_restaurant_details_shape() {
        let restaurant = models::Restaurant {
            id: 1,
            name: "Sanjay's Pizza".to_string(),
            address: "address2".to_string(),
        };
        let pizza = models::Pizza {
            id: 2,
            name: "Geri".to_string(),
            ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni".to_string(),
        };
        let rp = models::RestaurantPizza {
            id: 3,
            price: 7,
            restaurant_id: 1,
            pizza_id: 2,
        };

        let value = serde_json::to_value(serialize_restaurant_details(&restaurant, &[(rp, pizza)]))
            .unwrap();

        assert_eq!(
            value,
            json!({
                "id": 1,
                "name": "Sanjay's Pizza",
                "address": "address2",
                "restaurant_pizzas": [{
                    "id": 3,
                    "price": 7,
                    "pizza_id": 2,
                    "restaurant_id": 1,
                    "pizza": {
                        "id": 2,
                        "name": "Geri",
                        "ingredients": "Dough, Tomato Sauce, Cheese, Pepperoni"
                    }
                }]
            })
        );
    }
}

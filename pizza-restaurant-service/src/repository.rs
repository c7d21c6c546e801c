use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::models::{NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, Restaurant, RestaurantPizza};
use crate::schema::{pizzas, restaurant_pizzas, restaurants};

/// Fetch, insert and delete operations over one borrowed connection.
///
/// Callers decide the transaction boundary; wrap several calls in
/// `Connection::transaction` when they have to commit together.
pub struct Repository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> Repository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub fn list_restaurants(&mut self) -> QueryResult<Vec<Restaurant>> {
        restaurants::table
            .select(Restaurant::as_select())
            .order(restaurants::id)
            .load(self.conn)
    }

    pub fn find_restaurant(&mut self, id: i32) -> QueryResult<Option<Restaurant>> {
        restaurants::table
            .find(id)
            .select(Restaurant::as_select())
            .first(self.conn)
            .optional()
    }

    /// Associations owned by `restaurant`, each joined with its pizza.
    pub fn restaurant_pizzas_of(
        &mut self,
        restaurant: &Restaurant,
    ) -> QueryResult<Vec<(RestaurantPizza, Pizza)>> {
        RestaurantPizza::belonging_to(restaurant)
            .inner_join(pizzas::table)
            .select((RestaurantPizza::as_select(), Pizza::as_select()))
            .order(restaurant_pizzas::id)
            .load(self.conn)
    }

    pub fn insert_restaurant(&mut self, restaurant: &NewRestaurant) -> QueryResult<Restaurant> {
        diesel::insert_into(restaurants::table)
            .values(restaurant)
            .returning(Restaurant::as_returning())
            .get_result(self.conn)
    }

    /// Removes the restaurant's associations, then the restaurant itself.
    /// Returns the number of restaurant rows deleted. Runs as a savepoint
    /// when the caller already holds a transaction.
    pub fn delete_restaurant(&mut self, id: i32) -> QueryResult<usize> {
        self.conn.transaction(|conn| {
            diesel::delete(restaurant_pizzas::table.filter(restaurant_pizzas::restaurant_id.eq(id)))
                .execute(conn)?;
            diesel::delete(restaurants::table.find(id)).execute(conn)
        })
    }

    pub fn list_pizzas(&mut self) -> QueryResult<Vec<Pizza>> {
        pizzas::table
            .select(Pizza::as_select())
            .order(pizzas::id)
            .load(self.conn)
    }

    pub fn find_pizza(&mut self, id: i32) -> QueryResult<Option<Pizza>> {
        pizzas::table
            .find(id)
            .select(Pizza::as_select())
            .first(self.conn)
            .optional()
    }

    pub fn insert_pizza(&mut self, pizza: &NewPizza) -> QueryResult<Pizza> {
        diesel::insert_into(pizzas::table)
            .values(pizza)
            .returning(Pizza::as_returning())
            .get_result(self.conn)
    }

    pub fn insert_restaurant_pizza(
        &mut self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> QueryResult<RestaurantPizza> {
        diesel::insert_into(restaurant_pizzas::table)
            .values(restaurant_pizza)
            .returning(RestaurantPizza::as_returning())
            .get_result(self.conn)
    }

    /// Empties every table, dependents first.
    pub fn clear(&mut self) -> QueryResult<()> {
        self.conn.transaction(|conn| {
            diesel::delete(restaurant_pizzas::table).execute(conn)?;
            diesel::delete(restaurants::table).execute(conn)?;
            diesel::delete(pizzas::table).execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    fn seed(repo: &mut Repository) -> (Restaurant, Pizza) {
        let restaurant = repo
            .insert_restaurant(&NewRestaurant {
                name: "Karen's Pizza Shack",
                address: "address1",
            })
            .unwrap();
        let pizza = repo
            .insert_pizza(&NewPizza {
                name: "Emma",
                ingredients: "Dough, Tomato Sauce, Cheese",
            })
            .unwrap();
        (restaurant, pizza)
    }

    #[test]
    fn test_find_restaurant_missing() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);

        assert_eq!(repo.find_restaurant(42).unwrap(), None);
    }

    #[test]
    fn test_restaurant_pizzas_of_joins_pizza() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);
        let (restaurant, pizza) = seed(&mut repo);

        let created = repo
            .insert_restaurant_pizza(&NewRestaurantPizza {
                price: 12,
                restaurant_id: restaurant.id,
                pizza_id: pizza.id,
            })
            .unwrap();

        let found = repo.restaurant_pizzas_of(&restaurant).unwrap();
        assert_eq!(found, vec![(created, pizza)]);
    }

    #[test]
    fn test_insert_restaurant_pizza_dangling_foreign_key() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);
        let (restaurant, _) = seed(&mut repo);

        let result = repo.insert_restaurant_pizza(&NewRestaurantPizza {
            price: 5,
            restaurant_id: restaurant.id,
            pizza_id: 999,
        });

        assert!(matches!(
            result,
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _
            ))
        ));
    }

    #[test]
    fn test_insert_restaurant_pizza_price_check() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);
        let (restaurant, pizza) = seed(&mut repo);

        let result = repo.insert_restaurant_pizza(&NewRestaurantPizza {
            price: 31,
            restaurant_id: restaurant.id,
            pizza_id: pizza.id,
        });

        assert!(result.is_err());
        assert!(repo.restaurant_pizzas_of(&restaurant).unwrap().is_empty());
    }

    #[test]
    fn test_delete_restaurant_removes_associations() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);
        let (restaurant, pizza) = seed(&mut repo);
        repo.insert_restaurant_pizza(&NewRestaurantPizza {
            price: 3,
            restaurant_id: restaurant.id,
            pizza_id: pizza.id,
        })
        .unwrap();

        assert_eq!(repo.delete_restaurant(restaurant.id).unwrap(), 1);
        assert_eq!(repo.find_restaurant(restaurant.id).unwrap(), None);
        assert_eq!(repo.find_pizza(pizza.id).unwrap(), Some(pizza));

        let orphans: i64 = restaurant_pizzas::table
            .filter(restaurant_pizzas::restaurant_id.eq(restaurant.id))
            .count()
            .get_result(conn)
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_delete_restaurant_missing() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);

        assert_eq!(repo.delete_restaurant(7).unwrap(), 0);
    }

    #[test]
    fn test_list_pizzas_ordered() {
        let (_dir, pool) = test_pool();
        let conn: &mut SqliteConnection = &mut pool.get().unwrap();
        let mut repo = Repository::new(conn);
        seed(&mut repo);
        repo.insert_pizza(&NewPizza {
            name: "Geri",
            ingredients: "Dough, Tomato Sauce, Cheese, Pepperoni",
        })
        .unwrap();

        let names: Vec<_> = repo
            .list_pizzas()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Emma", "Geri"]);
    }
}

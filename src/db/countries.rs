use super::models::{Country, NewCountry};
use super::schema::countries::{dsl, table};
use super::Result;
use diesel::prelude::*;
use validator::Validate as _;

pub fn add(conn: &mut SqliteConnection, name: &str) -> Result<Country> {
    let new_country = NewCountry { name: name.trim() };
    new_country.validate()?;

    let country = diesel::insert_into(table)
        .values(&new_country)
        .returning(Country::as_returning())
        .get_result(conn)?;
    log::info!("Added country #{}, '{}'", country.id, country.name);
    Ok(country)
}

pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Country>> {
    Ok(dsl::countries
        .select(Country::as_select())
        .order(dsl::name)
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, country_id: i32) -> Result<Country> {
    Ok(dsl::countries
        .select(Country::as_select())
        .filter(dsl::id.eq(country_id))
        .first(conn)?)
}

/// Delete a country, along with its cities and everyone who lives in them.
pub fn delete(conn: &mut SqliteConnection, country_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::countries.filter(dsl::id.eq(country_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Deleted country #{country_id}");
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, cities, users};

    #[test]
    fn lists_countries_by_name() {
        let mut conn = db::test_connection();
        add(&mut conn, "Norway").expect("norway");
        add(&mut conn, "  Chile ").expect("chile");

        let names: Vec<String> = all(&mut conn)
            .expect("countries")
            .into_iter()
            .map(|country| country.to_string())
            .collect();
        assert_eq!(names, vec!["Chile", "Norway"]);
    }

    #[test]
    fn rejects_blank_and_long_names() {
        let mut conn = db::test_connection();
        assert!(add(&mut conn, "   ").is_err());
        assert!(add(&mut conn, &"x".repeat(31)).is_err());
        assert!(all(&mut conn).expect("countries").is_empty());
    }

    #[test]
    fn deleting_cascades_to_cities_and_users() {
        let mut conn = db::test_connection();
        let user = db::test_user(&mut conn, "resident");
        let city = cities::get(&mut conn, user.city_id).expect("city");

        assert_eq!(delete(&mut conn, city.country_id).expect("delete"), 1);
        assert!(cities::get(&mut conn, city.id)
            .expect_err("city is gone")
            .is_not_found());
        assert!(users::get(&mut conn, user.id)
            .expect_err("user is gone")
            .is_not_found());
        assert_eq!(delete(&mut conn, city.country_id).expect("delete again"), 0);
    }
}

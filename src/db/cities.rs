use super::models::{City, NewCity};
use super::schema::cities::{dsl, table};
use super::Result;
use diesel::prelude::*;
use validator::Validate as _;

pub fn add(conn: &mut SqliteConnection, name: &str, country_id: i32) -> Result<City> {
    let new_city = NewCity {
        name: name.trim(),
        country_id,
    };
    new_city.validate()?;

    let city = diesel::insert_into(table)
        .values(&new_city)
        .returning(City::as_returning())
        .get_result(conn)?;
    log::info!("Added city #{}, '{}'", city.id, city.name);
    Ok(city)
}

pub fn all(conn: &mut SqliteConnection) -> Result<Vec<City>> {
    Ok(dsl::cities
        .select(City::as_select())
        .order((dsl::country_id, dsl::name))
        .load(conn)?)
}

pub fn in_country(conn: &mut SqliteConnection, country_id: i32) -> Result<Vec<City>> {
    Ok(dsl::cities
        .select(City::as_select())
        .filter(dsl::country_id.eq(country_id))
        .order(dsl::name)
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, city_id: i32) -> Result<City> {
    Ok(dsl::cities
        .select(City::as_select())
        .filter(dsl::id.eq(city_id))
        .first(conn)?)
}

/// Delete a city and everyone who lives in it.
pub fn delete(conn: &mut SqliteConnection, city_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::cities.filter(dsl::id.eq(city_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Deleted city #{city_id}");
    }
    Ok(deleted)
}

use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;
use serde_json::{json, Value};

use car_registry_be::handlers::AppState;
use car_registry_be::model::{Car, CarFields, NewCar};
use car_registry_be::store::CarStore;

/// Keeps rows in insertion order, like an unindexed table scan.
#[derive(Default)]
pub struct MemoryStore {
    cars: Mutex<Vec<Car>>,
}

impl MemoryStore {
    pub fn rows(&self) -> Vec<Car> {
        self.cars.lock().unwrap().clone()
    }
}

#[async_trait]
impl CarStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Car>, sqlx::Error> {
        Ok(self.rows())
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<Car>, sqlx::Error> {
        Ok(self.rows().into_iter().filter(|car| car.id == id).collect())
    }

    /// Rejects a repeated id like the `carsid` primary key does.
    async fn create(&self, car: &NewCar) -> Result<(), sqlx::Error> {
        let mut cars = self.cars.lock().unwrap();
        if cars.iter().any(|existing| existing.id == car.id) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint \"cars_pkey\": {}",
                car.id
            )));
        }
        cars.push(car.clone().into_car());
        Ok(())
    }

    async fn update(&self, id: &str, fields: &CarFields) -> Result<u64, sqlx::Error> {
        let mut cars = self.cars.lock().unwrap();
        let mut affected = 0;
        for car in cars.iter_mut().filter(|car| car.id == id) {
            *car = fields.clone().into_car(id.to_string());
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let mut cars = self.cars.lock().unwrap();
        let before = cars.len();
        cars.retain(|car| car.id != id);
        Ok((before - cars.len()) as u64)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Fails every call the way a dropped connection would.
pub struct FailingStore;

#[async_trait]
impl CarStore for FailingStore {
    async fn list(&self) -> Result<Vec<Car>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn find_by_id(&self, _id: &str) -> Result<Vec<Car>, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn create(&self, _car: &NewCar) -> Result<(), sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn update(&self, _id: &str, _fields: &CarFields) -> Result<u64, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn delete(&self, _id: &str) -> Result<u64, sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Err(sqlx::Error::PoolTimedOut)
    }
}

pub fn state(store: Arc<dyn CarStore>) -> web::Data<AppState> {
    web::Data::new(AppState::new(store))
}

pub fn camry_payload() -> Value {
    json!({
        "cars_id": "1",
        "make": "Toyota",
        "model": "Camry",
        "licence_plate": "XYZ123",
        "owner_name": "John Doe",
        "date": "17-12-2023",
        "status": "active"
    })
}

pub fn update_payload() -> Value {
    json!({
        "make": "Updated Make",
        "model": "Updated Model",
        "licence_plate": "Updated Plate",
        "owner_name": "Updated Owner",
        "date": "25-12-2023",
        "status": "updated"
    })
}

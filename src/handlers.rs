use std::sync::Arc;

use actix_web::{delete, error, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::model::{CarFields, NewCar, Payload};
use crate::store::CarStore;

pub struct AppState {
    pub store: Arc<dyn CarStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CarStore>) -> Self {
        Self { store }
    }
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    data.store.ping().await?;
    Ok(HttpResponse::Ok().json(json!({ "status": "healthy" })))
}

#[get("/cars")]
async fn get_cars(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cars = data.store.list().await?;
    Ok(HttpResponse::Ok().json(cars))
}

#[get("/car/{id}")]
async fn get_car_by_id(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let car_id = path.into_inner();
    let cars = data.store.find_by_id(&car_id).await?;
    log::debug!("car {} matched {} row(s)", car_id, cars.len());
    Ok(HttpResponse::Ok().json(cars))
}

#[post("/car")]
async fn post_car(
    data: web::Data<AppState>,
    request: web::Json<Payload>,
) -> Result<HttpResponse, ApiError> {
    let new_car = NewCar::from_payload(request.into_inner())?;
    data.store.create(&new_car).await?;

    log::info!("created car {}", new_car.id);
    Ok(HttpResponse::Created().json(new_car.into_car()))
}

#[put("/car/{id}")]
async fn put_car(
    data: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<Payload>,
) -> Result<HttpResponse, ApiError> {
    let car_id = path.into_inner();
    let fields = CarFields::from_payload(request.into_inner())?;

    match data.store.update(&car_id, &fields).await? {
        0 => Err(ApiError::NotFound(car_id)),
        _ => {
            log::info!("updated car {}", car_id);
            Ok(HttpResponse::Ok().json(fields.into_car(car_id)))
        }
    }
}

#[delete("/car/{id}")]
async fn delete_car(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let car_id = path.into_inner();

    match data.store.delete(&car_id).await? {
        0 => Err(ApiError::NotFound(car_id)),
        _ => {
            log::info!("deleted car {}", car_id);
            Ok(HttpResponse::NoContent().finish())
        }
    }
}

/// Bodies that are not a JSON object of strings fail the same way as a
/// payload with the wrong keys.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(ApiError::Validation(err.to_string()))
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health)
        .service(get_cars)
        .service(get_car_by_id)
        .service(post_car)
        .service(put_car)
        .service(delete_car);
}

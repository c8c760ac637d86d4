use serde::{Deserialize, Serialize};

use crate::cars::repo::Car;

const CARD_WIDTH: usize = 20;

/// Compact card for the swipe deck.
#[derive(Debug, Serialize)]
pub struct CardInfo {
    pub car_id: i64,
    pub image_url: String,
    pub car_name: String,
    pub details: String,
}

impl From<&Car> for CardInfo {
    fn from(car: &Car) -> Self {
        let details = format!(
            "{:<w$}{:>w$}\n{:<w$}{:>w$}",
            format!("Price: £{}pm", car.monthly_payment),
            format!(" Body: {}", car.body_type),
            format!("Horsepower: {}bhp", car.horsepower),
            format!(" Make: {}", car.make),
            w = CARD_WIDTH,
        );
        Self {
            car_id: car.id,
            image_url: car.image.clone(),
            car_name: format!("{:^w$}", car.car_name, w = CARD_WIDTH),
            details,
        }
    }
}

/// Grid tile for the saved page, with the car's current popularity.
#[derive(Debug, Serialize)]
pub struct GridCar {
    pub car_id: i64,
    pub image_url: String,
    pub car_name: String,
    pub like_count: i32,
}

impl From<&Car> for GridCar {
    fn from(car: &Car) -> Self {
        Self {
            car_id: car.id,
            image_url: car.image.clone(),
            car_name: car.car_name.clone(),
            like_count: car.like_count,
        }
    }
}

/// Everything about one car, for the single view.
#[derive(Debug, Serialize)]
pub struct FullDetails {
    pub image_url: String,
    pub car_name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub body_type: String,
    pub horsepower: i32,
    pub monthly_payment: f64,
    pub mileage: i32,
}

impl From<Car> for FullDetails {
    fn from(car: Car) -> Self {
        Self {
            image_url: car.image,
            car_name: car.car_name,
            make: car.make,
            model: car.model,
            year: car.year,
            body_type: car.body_type,
            horsepower: car.horsepower,
            monthly_payment: car.monthly_payment,
            mileage: car.mileage,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExploreResponse {
    pub cars_remain: bool,
    pub cars: Vec<CardInfo>,
}

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub liked_exist: bool,
    pub cars: Vec<GridCar>,
}

/// Body of the popularity toggle. `liked` is kept as raw JSON so that
/// absent, null and non-boolean values can all be rejected the same way
/// while true/false pass through.
#[derive(Debug, Deserialize)]
pub struct ToggleCountRequest {
    #[serde(default)]
    pub liked: Option<serde_json::Value>,
}

impl ToggleCountRequest {
    /// Strict tri-state read: only a genuine JSON boolean counts.
    pub fn liked(&self) -> Option<bool> {
        match self.liked {
            Some(serde_json::Value::Bool(b)) => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleCountResponse {
    pub like_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn car() -> Car {
        Car {
            id: 1,
            image: "ferrariTestarossa1".into(),
            car_name: "Ferrari Testarossa".into(),
            make: "Ferrari".into(),
            model: "Testarossa".into(),
            year: 1984,
            body_type: "2-door berlinetta".into(),
            horsepower: 385,
            monthly_payment: 4185.91,
            mileage: 146545,
            like_count: 10,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn card_info_formats_two_padded_lines() {
        let card = CardInfo::from(&car());
        assert_eq!(card.car_id, 1);
        let lines: Vec<&str> = card.details.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Price: £4185.91pm"));
        assert!(lines[0].ends_with("2-door berlinetta"));
        assert!(lines[1].starts_with("Horsepower: 385bhp"));
        assert!(lines[1].ends_with("Ferrari"));
    }

    #[test]
    fn toggle_request_accepts_only_genuine_booleans() {
        let parse = |body: &str| {
            serde_json::from_str::<ToggleCountRequest>(body)
                .unwrap()
                .liked()
        };
        assert_eq!(parse(r#"{"liked": true}"#), Some(true));
        assert_eq!(parse(r#"{"liked": false}"#), Some(false));
        assert_eq!(parse(r#"{"liked": null}"#), None);
        assert_eq!(parse(r#"{"liked": "true"}"#), None);
        assert_eq!(parse(r#"{"liked": 1}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn grid_car_carries_the_denormalized_count() {
        let grid = GridCar::from(&car());
        assert_eq!(grid.like_count, 10);
        assert_eq!(grid.car_name, "Ferrari Testarossa");
    }
}

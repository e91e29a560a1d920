//! Wire types shared with the REST backend.
//! Shapes mirror the backend's JSON exactly (camelCase fields, `_id` keys);
//! the backend owns the canonical lifecycle of every entity, the client only
//! reads and mutates through the endpoints in `api`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetCategory {
    Cat,
    Dog,
    Rabbit,
    Fish,
    Bird,
}

impl PetCategory {
    pub const ALL: [PetCategory; 5] = [
        PetCategory::Cat,
        PetCategory::Dog,
        PetCategory::Rabbit,
        PetCategory::Fish,
        PetCategory::Bird,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetCategory::Cat => "cat",
            PetCategory::Dog => "dog",
            PetCategory::Rabbit => "rabbit",
            PetCategory::Fish => "fish",
            PetCategory::Bird => "bird",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(rename = "_id")]
    pub id: String,
    pub pet_name: String,
    pub pet_age: u32,
    pub pet_category: PetCategory,
    pub pet_location: String,
    pub short_description: String,
    pub long_description: String,
    pub pet_image: String,
    pub owner_email: String,
    pub owner_name: String,
    #[serde(default)]
    pub adopted: bool,
    pub date_added: DateTime<Utc>,
}

/// Create/update payload for a pet; the backend assigns `_id`, `adopted`
/// and `dateAdded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub pet_name: String,
    pub pet_age: u32,
    pub pet_category: PetCategory,
    pub pet_location: String,
    pub short_description: String,
    pub long_description: String,
    pub pet_image: String,
    pub owner_email: String,
    pub owner_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationCampaign {
    #[serde(rename = "_id")]
    pub id: String,
    pub pet_name: String,
    pub pet_image: String,
    pub max_donation_amount: f64,
    #[serde(default)]
    pub donated_amount: f64,
    pub last_date_of_donation: NaiveDate,
    pub short_description: String,
    pub long_description: String,
    pub owner_email: String,
    #[serde(default)]
    pub is_paused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub pet_name: String,
    pub pet_image: String,
    pub max_donation_amount: f64,
    pub last_date_of_donation: NaiveDate,
    pub short_description: String,
    pub long_description: String,
    pub owner_email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_address: String,
    pub pet_id: String,
    pub pet_name: String,
    pub pet_image: String,
    pub pet_owner_email: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdoptionRequest {
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_address: String,
    pub pet_id: String,
    pub pet_name: String,
    pub pet_image: String,
    pub pet_owner_email: String,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub donator_name: String,
    pub donator_email: String,
    pub donation_amount: f64,
    pub campaign_id: String,
    pub pet_name: String,
    pub pet_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub pets: u64,
    #[serde(default)]
    pub total_donations: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub pets_added: u64,
    #[serde(default)]
    pub campaigns_created: u64,
    #[serde(default)]
    pub total_donated: f64,
}

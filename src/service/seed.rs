// service/seed.rs
use crate::{
    db::{propertydb::PropertyExt, userdb::UserExt},
    dtos::propertydtos::{CreatePropertyDto, LocationDto},
    models::{
        propertymodel::{PriceType, PropertyStatus, PropertyType},
        usermodel::UserRole,
    },
    service::error::ServiceError,
    utils::password,
};

struct DemoListing {
    title: &'static str,
    description: &'static str,
    property_type: PropertyType,
    status: PropertyStatus,
    price: f64,
    price_type: PriceType,
    area: f64,
    rooms: (i32, i32, i32),
    year_built: Option<i32>,
    address: &'static str,
    city: &'static str,
    state: &'static str,
    pincode: &'static str,
    amenities: &'static [&'static str],
    featured: bool,
}

const DEMO_LISTINGS: &[DemoListing] = &[
    DemoListing {
        title: "Luxurious 3BHK in Bandra West",
        description: "Sea-facing apartment with modern interiors and premium fittings, walking distance to Bandstand Promenade.",
        property_type: PropertyType::Apartment,
        status: PropertyStatus::ForSale,
        price: 45_000_000.0,
        price_type: PriceType::Total,
        area: 1800.0,
        rooms: (3, 3, 2),
        year_built: Some(2019),
        address: "12 Sea Face Road, Bandstand",
        city: "Mumbai",
        state: "Maharashtra",
        pincode: "400050",
        amenities: &["Pool", "Gym", "Security", "Elevator", "Parking"],
        featured: true,
    },
    DemoListing {
        title: "Colonial Villa in Koregaon Park",
        description: "Four-bedroom colonial villa with a lush garden and private pool.",
        property_type: PropertyType::Villa,
        status: PropertyStatus::ForSale,
        price: 85_000_000.0,
        price_type: PriceType::Total,
        area: 5500.0,
        rooms: (4, 5, 4),
        year_built: Some(1985),
        address: "7 Rose Garden Lane, Koregaon Park",
        city: "Pune",
        state: "Maharashtra",
        pincode: "411001",
        amenities: &["Pool", "Garden", "Security", "Parking", "Gym"],
        featured: true,
    },
    DemoListing {
        title: "Modern Studio in Indiranagar",
        description: "Furnished studio with smart home features, minutes from the MG Road metro station.",
        property_type: PropertyType::Apartment,
        status: PropertyStatus::ForRent,
        price: 28_000.0,
        price_type: PriceType::PerMonth,
        area: 550.0,
        rooms: (1, 1, 1),
        year_built: Some(2022),
        address: "56 100ft Road, Indiranagar",
        city: "Bangalore",
        state: "Karnataka",
        pincode: "560038",
        amenities: &["WiFi", "Air-Conditioning", "Security", "Elevator"],
        featured: false,
    },
    DemoListing {
        title: "Premium Office Space in Cyber City",
        description: "Grade-A open-plan office space with round-the-clock security and a rooftop cafeteria.",
        property_type: PropertyType::Office,
        status: PropertyStatus::ForRent,
        price: 150_000.0,
        price_type: PriceType::PerMonth,
        area: 3000.0,
        rooms: (0, 4, 10),
        year_built: Some(2020),
        address: "Tower B, DLF Cyber City",
        city: "Gurugram",
        state: "Haryana",
        pincode: "122002",
        amenities: &["Elevator", "Security", "Parking", "WiFi", "Air-Conditioning"],
        featured: true,
    },
    DemoListing {
        title: "2BHK Independent House in Adyar",
        description: "Independent house with a private terrace garden and attached garage near Adyar beach.",
        property_type: PropertyType::House,
        status: PropertyStatus::ForSale,
        price: 18_500_000.0,
        price_type: PriceType::Total,
        area: 1400.0,
        rooms: (2, 2, 1),
        year_built: Some(2010),
        address: "34 Lattice Bridge Road, Adyar",
        city: "Chennai",
        state: "Tamil Nadu",
        pincode: "600020",
        amenities: &["Parking", "Garden", "Security"],
        featured: false,
    },
    DemoListing {
        title: "Agricultural Land in Lonavala",
        description: "Fertile land with mountain views, suited to a farmhouse or eco-resort. All approvals available.",
        property_type: PropertyType::Land,
        status: PropertyStatus::ForSale,
        price: 12_000_000.0,
        price_type: PriceType::Total,
        area: 20000.0,
        rooms: (0, 0, 0),
        year_built: None,
        address: "Near Bhushi Dam, NH-48",
        city: "Lonavala",
        state: "Maharashtra",
        pincode: "410401",
        amenities: &[],
        featured: false,
    },
];

impl DemoListing {
    fn to_dto(&self) -> CreatePropertyDto {
        let (bedrooms, bathrooms, parking) = self.rooms;
        CreatePropertyDto {
            title: self.title.to_string(),
            description: self.description.to_string(),
            property_type: self.property_type,
            status: Some(self.status),
            price: self.price,
            price_type: Some(self.price_type),
            area: self.area,
            area_unit: None,
            bedrooms: Some(bedrooms),
            bathrooms: Some(bathrooms),
            parking: Some(parking),
            year_built: self.year_built,
            images: vec![],
            location: LocationDto {
                address: self.address.to_string(),
                city: self.city.to_string(),
                state: self.state.to_string(),
                country: None,
                pincode: Some(self.pincode.to_string()),
                latitude: None,
                longitude: None,
            },
            amenities: self.amenities.iter().map(|a| a.to_string()).collect(),
            featured: Some(self.featured),
            is_active: Some(true),
        }
    }
}

/// Creates the demo accounts and listings when the user table is empty.
/// Returns whether anything was written.
pub async fn seed_demo_data<S>(db_client: &S) -> Result<bool, ServiceError>
where
    S: UserExt + PropertyExt + Sync,
{
    if db_client.get_user_count().await? > 0 {
        tracing::info!("Users already present, skipping demo data");
        return Ok(false);
    }

    let admin_password =
        password::hash("admin123").map_err(|e| ServiceError::Hashing(e.to_string()))?;
    let user_password =
        password::hash("user123").map_err(|e| ServiceError::Hashing(e.to_string()))?;

    let admin = db_client
        .save_user(
            "Admin User",
            "admin@estate.com",
            admin_password.as_str(),
            Some("+91 98765 43210".to_string()),
            UserRole::Admin,
        )
        .await?;
    db_client
        .save_user(
            "John Doe",
            "user@estate.com",
            user_password.as_str(),
            Some("+91 87654 32109".to_string()),
            UserRole::User,
        )
        .await?;

    for listing in DEMO_LISTINGS {
        db_client.create_property(admin.id, listing.to_dto()).await?;
    }

    tracing::info!(
        "Seeded demo data: admin@estate.com / admin123, user@estate.com / user123, {} listings",
        DEMO_LISTINGS.len()
    );
    Ok(true)
}

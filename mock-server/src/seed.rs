//! Fixture records served by a fresh mock upstream.

use serde_json::{json, Value};

pub fn users() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "firstName": "Emily", "lastName": "Johnson", "maidenName": "Smith",
            "age": 28, "gender": "female", "email": "emily.johnson@x.dummyjson.com",
            "phone": "+81 965-431-3024", "username": "emilys", "password": "emilyspass",
            "birthDate": "1996-5-30", "image": "https://dummyjson.com/icon/emilys/128",
            "bloodGroup": "O-", "height": 193.24, "weight": 63.16, "eyeColor": "Green",
            "hair": {"color": "Brown", "type": "Curly"},
            "address": {
                "address": "626 Main Street", "city": "Phoenix", "state": "Mississippi",
                "stateCode": "MS", "postalCode": "29112",
                "coordinates": {"lat": -77.16213, "lng": -92.084824}, "country": "United States"
            },
            "role": "admin"
        }),
        json!({
            "id": 2, "firstName": "Michael", "lastName": "Williams", "maidenName": "",
            "age": 35, "gender": "male", "email": "michael.williams@x.dummyjson.com",
            "phone": "+49 258-627-6644", "username": "michaelw", "password": "michaelwpass",
            "birthDate": "1989-8-10", "image": "https://dummyjson.com/icon/michaelw/128",
            "bloodGroup": "B+", "height": 186.22, "weight": 76.32, "eyeColor": "Red",
            "hair": {"color": "Green", "type": "Straight"},
            "role": "admin"
        }),
        json!({
            "id": 3, "firstName": "Sophia", "lastName": "Brown", "maidenName": "",
            "age": 42, "gender": "female", "email": "sophia.brown@x.dummyjson.com",
            "phone": "+81 210-652-2785", "username": "sophiab", "password": "sophiabpass",
            "birthDate": "1982-11-6", "image": "https://dummyjson.com/icon/sophiab/128",
            "bloodGroup": "O-", "height": 177.72, "weight": 52.6, "eyeColor": "Hazel",
            "hair": {"color": "White", "type": "Wavy"},
            "role": "admin"
        }),
        json!({
            "id": 4, "firstName": "James", "lastName": "Davis", "maidenName": "",
            "age": 45, "gender": "male", "email": "james.davis@x.dummyjson.com",
            "phone": "+49 614-958-9364", "username": "jamesd", "password": "jamesdpass",
            "birthDate": "1979-5-4", "image": "https://dummyjson.com/icon/jamesd/128",
            "bloodGroup": "AB+", "height": 193.31, "weight": 62.1, "eyeColor": "Amber",
            "hair": {"color": "Brown", "type": "Wavy"},
            "role": "moderator"
        }),
        json!({
            "id": 5, "firstName": "Emma", "lastName": "Miller", "maidenName": "Johnson",
            "age": 30, "gender": "female", "email": "emma.miller@x.dummyjson.com",
            "phone": "+91 759-776-1614", "username": "emmaj", "password": "emmajpass",
            "birthDate": "1994-6-13", "image": "https://dummyjson.com/icon/emmaj/128",
            "bloodGroup": "AB-", "height": 178.32, "weight": 67.74, "eyeColor": "Blue",
            "hair": {"color": "Black", "type": "Straight"},
            "role": "user"
        }),
    ]
}

pub fn products() -> Vec<Value> {
    let rows: [(u64, &str, &str, f64, f64, f64, u32, Option<&str>); 9] = [
        (1, "Essence Mascara Lash Princess", "beauty", 9.99, 7.17, 4.94, 5, Some("Essence")),
        (2, "Eyeshadow Palette with Mirror", "beauty", 19.99, 5.5, 3.28, 44, Some("Glamour Beauty")),
        (3, "Chanel Coco Noir Eau De", "fragrances", 129.99, 16.51, 4.26, 58, Some("Chanel")),
        (4, "Annibale Colombo Bed", "furniture", 1899.99, 8.09, 4.14, 47, Some("Annibale Colombo")),
        (5, "Apple", "groceries", 1.99, 12.62, 4.19, 8, None),
        (6, "iPhone 9", "smartphones", 549.0, 12.96, 4.69, 94, Some("Apple")),
        (7, "Samsung Universe 9 phone", "smartphones", 1249.0, 15.46, 4.09, 36, Some("Samsung")),
        (8, "Blue & Black Check Shirt", "mens-shirts", 29.99, 15.35, 3.64, 38, Some("Fashion Trends")),
        (9, "Gigabyte Aorus Men Tshirt", "mens-shirts", 24.99, 12.6, 4.13, 90, Some("Gigabyte")),
    ];

    rows.into_iter()
        .map(|(id, title, category, price, discount, rating, stock, brand)| {
            let mut product = json!({
                "id": id,
                "title": title,
                "description": format!("{title} from the {category} range."),
                "category": category,
                "price": price,
                "discountPercentage": discount,
                "rating": rating,
                "stock": stock,
                "tags": [category],
                "sku": format!("SKU-{id:04}"),
                "thumbnail": format!("https://cdn.dummyjson.com/products/{id}/thumbnail.webp"),
                "images": [format!("https://cdn.dummyjson.com/products/{id}/1.webp")],
                "dimensions": {"width": 15.0, "height": 10.0, "depth": 5.0}
            });
            if let (Some(brand), Some(object)) = (brand, product.as_object_mut()) {
                object.insert("brand".to_string(), json!(brand));
            }
            product
        })
        .collect()
}

/// Display name for a category slug: `mens-shirts` -> `Mens Shirts`.
pub fn category_name(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

//! Option lists backing the select inputs of the registration forms.

pub const CROP_TYPES: [&str; 21] = [
    "Rice",
    "Wheat",
    "Sugarcane",
    "Cotton",
    "Soybean",
    "Maize",
    "Bajra",
    "Jowar",
    "Groundnut",
    "Sunflower",
    "Onion",
    "Potato",
    "Tomato",
    "Chilli",
    "Turmeric",
    "Coconut",
    "Banana",
    "Mango",
    "Grapes",
    "Pomegranate",
    "Other",
];

pub const STATES: [&str; 28] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

fn contains(options: &[&str], value: &str) -> bool {
    options.iter().any(|o| o.eq_ignore_ascii_case(value.trim()))
}

pub fn is_known_state(name: &str) -> bool {
    contains(&STATES, name)
}

pub fn is_known_crop(name: &str) -> bool {
    contains(&CROP_TYPES, name)
}

/// Map spoken category names onto catalog category keys.
///
/// Unknown inputs are lowercased and trimmed; matching against item
/// categories is then done by substring in either direction, so plurals
/// such as "hoodies" or "mugs" need no entry here.
pub fn normalize_category(raw: &str) -> String {
    let cat = raw.trim().to_lowercase();
    match cat.as_str() {
        "phone" | "phones" | "mobile" | "mobiles" | "mobile phone" | "mobile phones"
        | "smartphone" | "smartphones" => "mobile".to_string(),
        "tee" | "tees" | "tshirt" | "tshirts" | "t-shirt" | "t-shirts" | "t shirt"
        | "t shirts" => "tshirt".to_string(),
        _ => cat,
    }
}

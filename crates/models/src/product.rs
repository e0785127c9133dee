use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A catalog record as stored in the backing document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: u32,
}

/// Creation input: every field except `id`, which the store assigns.
///
/// Missing JSON keys fall back to empty/zero values so that an incomplete
/// payload is reported by [`NewProduct::validate`] instead of failing to parse.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub thumbnail: String,
    pub code: String,
    pub stock: u32,
}

/// Partial update. There is no `id` field, so an `id` key in an update body
/// is dropped during deserialization.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

pub fn validate_text(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if price == 0.0 || !price.is_finite() {
        return Err(ModelError::Validation("price is required".into()));
    }
    Ok(())
}

pub fn validate_stock(stock: u32) -> Result<(), ModelError> {
    if stock == 0 {
        return Err(ModelError::Validation("stock is required".into()));
    }
    Ok(())
}

impl NewProduct {
    /// Every field must be populated: text non-blank, numbers non-zero.
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_text("title", &self.title)?;
        validate_text("description", &self.description)?;
        validate_price(self.price)?;
        validate_text("thumbnail", &self.thumbnail)?;
        validate_text("code", &self.code)?;
        validate_stock(self.stock)?;
        Ok(())
    }

    pub fn into_product(self, id: u64) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
        }
    }
}

impl ProductPatch {
    /// Supplied fields follow the same rules as on creation.
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(v) = &self.title { validate_text("title", v)?; }
        if let Some(v) = &self.description { validate_text("description", v)?; }
        if let Some(v) = self.price { validate_price(v)?; }
        if let Some(v) = &self.thumbnail { validate_text("thumbnail", v)?; }
        if let Some(v) = &self.code { validate_text("code", v)?; }
        if let Some(v) = self.stock { validate_stock(v)?; }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.thumbnail.is_none()
            && self.code.is_none()
            && self.stock.is_none()
    }
}

impl Product {
    /// Merge the supplied fields in place; `id` is never touched.
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(v) = patch.title { self.title = v; }
        if let Some(v) = patch.description { self.description = v; }
        if let Some(v) = patch.price { self.price = v; }
        if let Some(v) = patch.thumbnail { self.thumbnail = v; }
        if let Some(v) = patch.code { self.code = v; }
        if let Some(v) = patch.stock { self.stock = v; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tshirt() -> NewProduct {
        NewProduct {
            title: "T-shirt".into(),
            description: "White cotton t-shirt".into(),
            price: 150.0,
            thumbnail: "img1.jpg".into(),
            code: "A01".into(),
            stock: 200,
        }
    }

    #[test]
    fn complete_input_passes_validation() {
        assert!(tshirt().validate().is_ok());
    }

    #[test]
    fn blank_or_zero_fields_are_rejected() {
        let blank_title = NewProduct { title: "  ".into(), ..tshirt() };
        assert!(matches!(blank_title.validate(), Err(ModelError::Validation(_))));

        let zero_price = NewProduct { price: 0.0, ..tshirt() };
        assert!(matches!(zero_price.validate(), Err(ModelError::Validation(_))));

        let nan_price = NewProduct { price: f64::NAN, ..tshirt() };
        assert!(nan_price.validate().is_err());

        let zero_stock = NewProduct { stock: 0, ..tshirt() };
        assert!(zero_stock.validate().is_err());
    }

    #[test]
    fn missing_json_keys_deserialize_then_fail_validation() {
        let input: NewProduct = serde_json::from_str(r#"{"title":"Pants","price":200}"#).unwrap();
        assert_eq!(input.code, "");
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "validation error: description is required");
    }

    #[test]
    fn patch_ignores_id_and_merges_only_supplied_fields() {
        let patch: ProductPatch = serde_json::from_str(r#"{"id":99,"price":500}"#).unwrap();
        let mut product = tshirt().into_product(1);
        product.apply(patch);
        assert_eq!(product.id, 1);
        assert_eq!(product.price, 500.0);
        assert_eq!(product.title, "T-shirt");
        assert_eq!(product.stock, 200);
    }

    #[test]
    fn patch_validation_checks_supplied_fields_only() {
        assert!(ProductPatch::default().validate().is_ok());
        assert!(ProductPatch::default().is_empty());
        let bad = ProductPatch { code: Some(String::new()), ..Default::default() };
        assert!(bad.validate().is_err());
    }
}

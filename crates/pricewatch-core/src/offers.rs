//! Offer records as decoded from the aggregator's `Offers` payload.
//!
//! The aggregator owns the wire schema. Fields the model names are typed;
//! anything else is kept verbatim in [`Offer::extra`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One product listing from a single results page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price_old: Option<f32>,
    pub price_new: Option<f32>,
    pub discount: Option<f32>,
    pub quantity: Option<f32>,
    pub quantity_unit: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub retailer_id: Option<String>,

    /// Schema fields without a typed counterpart, keyed `field_<tag>`.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Offer {
    /// Column names of the typed fields, in declaration order.
    pub const COLUMNS: [&'static str; 11] = [
        "id",
        "description",
        "image_url",
        "price_old",
        "price_new",
        "discount",
        "quantity",
        "quantity_unit",
        "date_start",
        "date_end",
        "retailer_id",
    ];

    /// Renders the typed fields in [`Offer::COLUMNS`] order. Absent values
    /// become empty strings.
    #[must_use]
    pub fn cells(&self) -> [String; 11] {
        fn text(v: Option<&String>) -> String {
            v.cloned().unwrap_or_default()
        }
        fn number(v: Option<f32>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }

        [
            text(self.id.as_ref()),
            text(self.description.as_ref()),
            text(self.image_url.as_ref()),
            number(self.price_old),
            number(self.price_new),
            number(self.discount),
            number(self.quantity),
            text(self.quantity_unit.as_ref()),
            text(self.date_start.as_ref()),
            text(self.date_end.as_ref()),
            text(self.retailer_id.as_ref()),
        ]
    }
}

/// An [`Offer`] tagged with where and when it was collected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopOffer {
    pub city: String,
    pub shop: String,
    pub page: u32,
    pub processed_date: NaiveDate,
    pub offer: Offer,
}

impl ShopOffer {
    /// Collection metadata columns appended after the offer columns.
    pub const METADATA_COLUMNS: [&'static str; 4] = ["city", "shop", "page", "processed_date"];

    /// Renders the metadata in [`ShopOffer::METADATA_COLUMNS`] order.
    #[must_use]
    pub fn metadata_cells(&self) -> [String; 4] {
        [
            self.city.clone(),
            self.shop.clone(),
            self.page.to_string(),
            self.processed_date.format("%Y-%m-%d").to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_leave_absent_values_empty() {
        let offer = Offer {
            description: Some("Milk 3.2%".to_string()),
            price_new: Some(89.99),
            ..Offer::default()
        };
        let cells = offer.cells();
        assert_eq!(cells[0], "");
        assert_eq!(cells[1], "Milk 3.2%");
        assert_eq!(cells[3], "");
        assert_eq!(cells[4], "89.99");
        assert_eq!(cells.len(), Offer::COLUMNS.len());
    }

    #[test]
    fn metadata_cells_format_date_with_dashes() {
        let row = ShopOffer {
            city: "moskva".to_string(),
            shop: "5ka".to_string(),
            page: 7,
            processed_date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            offer: Offer::default(),
        };
        assert_eq!(row.metadata_cells(), ["moskva", "5ka", "7", "2024-03-09"]);
    }
}

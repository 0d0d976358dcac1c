//! Decoder for the aggregator's protobuf `Offers` payload.
//!
//! The schema is owned by the aggregator. The message types below model the
//! fields we read. Each offer's raw fields are walked first: fields matching
//! the modeled tag and type go to [`OfferMessage`], everything else (unknown
//! tags, or a modeled tag arriving with another wire type or non-UTF-8 text)
//! is collected into [`Offer::extra`] as `field_<tag>`.
//!
//! ```text
//! message Offers { repeated Offer offer = 1; }
//! message Offer {
//!   bytes  id = 1;          string description = 2;   string image_url = 3;
//!   float  price_old = 4;   float  price_new = 5;     float  discount = 6;
//!   float  quantity = 7;    string quantity_unit = 8;
//!   string date_start = 9;  string date_end = 10;     bytes  retailer_id = 11;
//! }
//! ```

use std::collections::BTreeMap;

use pricewatch_core::Offer;
use prost::encoding::decode_varint;
use prost::Message as _;
use thiserror::Error;

const WIRE_LEN: u64 = 2;
const WIRE_FIXED32: u64 = 5;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not a valid Offers message: {0}")]
    Proto(#[from] prost::DecodeError),

    #[error("unsupported wire type {wire_type} for field {tag}")]
    UnsupportedWireType { tag: u32, wire_type: u64 },

    #[error("field {tag} runs past the end of the offer")]
    Truncated { tag: u32 },

    #[error("invalid field key {0}")]
    InvalidKey(u64),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OffersMessage {
    #[prost(message, repeated, tag = "1")]
    pub offer: Vec<OfferMessage>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OfferMessage {
    #[prost(bytes = "vec", optional, tag = "1")]
    pub id: Option<Vec<u8>>,
    #[prost(string, optional, tag = "2")]
    pub description: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub image_url: Option<String>,
    #[prost(float, optional, tag = "4")]
    pub price_old: Option<f32>,
    #[prost(float, optional, tag = "5")]
    pub price_new: Option<f32>,
    #[prost(float, optional, tag = "6")]
    pub discount: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub quantity: Option<f32>,
    #[prost(string, optional, tag = "8")]
    pub quantity_unit: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub date_start: Option<String>,
    #[prost(string, optional, tag = "10")]
    pub date_end: Option<String>,
    #[prost(bytes = "vec", optional, tag = "11")]
    pub retailer_id: Option<Vec<u8>>,
}

/// Same wire layout as [`OffersMessage`], keeping each offer's raw bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawOffers {
    #[prost(bytes = "vec", repeated, tag = "1")]
    offer: Vec<Vec<u8>>,
}

/// Decodes one results page into offers, in payload order.
///
/// An empty payload is a valid `Offers` message with no entries.
///
/// # Errors
///
/// Returns [`DecodeError`] if the payload or any embedded offer is not
/// well-formed protobuf. Type drift in a modeled field is not an error.
pub fn decode_offers(payload: &[u8]) -> Result<Vec<Offer>, DecodeError> {
    let raw = RawOffers::decode(payload)?;
    raw.offer.iter().map(|bytes| decode_offer(bytes)).collect()
}

fn decode_offer(bytes: &[u8]) -> Result<Offer, DecodeError> {
    let (modeled, extra) = split_fields(bytes)?;
    let message = OfferMessage::decode(modeled.as_slice())?;

    Ok(Offer {
        id: message.id.as_deref().map(render_id),
        description: message.description,
        image_url: message.image_url,
        price_old: message.price_old,
        price_new: message.price_new,
        discount: message.discount,
        quantity: message.quantity,
        quantity_unit: message.quantity_unit,
        date_start: message.date_start,
        date_end: message.date_end,
        retailer_id: message.retailer_id.as_deref().map(render_id),
        extra,
    })
}

/// Splits an offer's raw fields into the bytes [`OfferMessage`] can decode
/// and the rendered `field_<tag>` values for everything else.
/// Repeated occurrences in `extra` are joined with `;`.
fn split_fields(mut buf: &[u8]) -> Result<(Vec<u8>, BTreeMap<String, String>), DecodeError> {
    let mut modeled = Vec::with_capacity(buf.len());
    let mut extra: BTreeMap<String, String> = BTreeMap::new();

    while !buf.is_empty() {
        let field_start = buf;
        let key = decode_varint(&mut buf)?;
        let tag = u32::try_from(key >> 3).map_err(|_| DecodeError::InvalidKey(key))?;
        let wire_type = key & 0x7;

        let mut delimited = None;
        let value = match wire_type {
            0 => decode_varint(&mut buf)?.to_string(),
            1 => {
                let raw = take(&mut buf, 8, tag)?;
                let word: [u8; 8] = raw.try_into().map_err(|_| DecodeError::Truncated { tag })?;
                u64::from_le_bytes(word).to_string()
            }
            WIRE_LEN => {
                let len = usize::try_from(decode_varint(&mut buf)?)
                    .map_err(|_| DecodeError::Truncated { tag })?;
                let payload = take(&mut buf, len, tag)?;
                delimited = Some(payload);
                render_bytes(payload)
            }
            WIRE_FIXED32 => {
                let raw = take(&mut buf, 4, tag)?;
                let word: [u8; 4] = raw.try_into().map_err(|_| DecodeError::Truncated { tag })?;
                u32::from_le_bytes(word).to_string()
            }
            wire_type => return Err(DecodeError::UnsupportedWireType { tag, wire_type }),
        };

        if fits_model(tag, wire_type, delimited) {
            let consumed = field_start.len() - buf.len();
            modeled.extend_from_slice(&field_start[..consumed]);
            continue;
        }

        extra
            .entry(format!("field_{tag}"))
            .and_modify(|existing| {
                existing.push(';');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    Ok((modeled, extra))
}

/// Whether a field can be handed to [`OfferMessage`] as-is.
fn fits_model(tag: u32, wire_type: u64, delimited: Option<&[u8]>) -> bool {
    match tag {
        1 | 11 => wire_type == WIRE_LEN,
        2 | 3 | 8..=10 => delimited.is_some_and(|text| std::str::from_utf8(text).is_ok()),
        4..=7 => wire_type == WIRE_FIXED32,
        _ => false,
    }
}

fn take<'a>(buf: &mut &'a [u8], len: usize, tag: u32) -> Result<&'a [u8], DecodeError> {
    if buf.len() < len {
        return Err(DecodeError::Truncated { tag });
    }
    let (head, rest) = buf.split_at(len);
    *buf = rest;
    Ok(head)
}

/// 16-byte identifiers are UUIDs; anything else falls back to hex.
fn render_id(bytes: &[u8]) -> String {
    uuid::Uuid::from_slice(bytes).map_or_else(|_| hex(bytes), |id| id.to_string())
}

fn render_bytes(bytes: &[u8]) -> String {
    std::str::from_utf8(bytes).map_or_else(|_| hex(bytes), str::to_owned)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "proto_test.rs"]
mod tests;

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

pub mod compound_packet;
pub mod error;
pub mod full_intra_request;
pub mod goodbye;
pub mod header;
pub mod packet;
pub mod picture_loss_indication;
pub mod rapid_resynchronization_request;
pub mod raw_packet;
pub mod receiver_estimated_maximum_bitrate;
pub mod receiver_report;
pub mod reception_report;
pub mod sender_report;
pub mod slice_loss_indication;
pub mod source_description;
pub mod transport_layer_cc;
pub mod transport_layer_nack;
mod util;

pub use error::Error;

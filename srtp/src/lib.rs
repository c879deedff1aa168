#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

pub mod cipher;
pub mod config;
pub mod context;
pub mod error;
mod key_derivation;
pub mod option;
pub mod protection_profile;
pub mod session;
pub mod stream;

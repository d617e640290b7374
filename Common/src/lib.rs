#![allow(non_snake_case)]

pub mod studio;
pub mod utils;

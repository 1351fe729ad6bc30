#![no_std]

pub use bise;

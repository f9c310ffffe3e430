pub mod media;
pub mod pages;
pub mod partners;
pub mod programs;
pub mod stats;
pub mod submissions;
pub mod tracks;
pub mod users;

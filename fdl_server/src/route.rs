pub mod festivals;

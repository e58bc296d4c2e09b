mod common;
mod test_catalog;
mod test_open;


pub use app::{
    LIMIT, StubSource, get, make_test_app, make_test_app_in, read_body, read_json, seed_row,
};

pub mod m202506010001_create_rate_limits;

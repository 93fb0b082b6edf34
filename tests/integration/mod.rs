mod helpers;
mod test_catalog;
mod test_classify;
mod test_crosswalk;
mod test_enforce;
mod test_promote;
mod test_properties;
mod test_refresh_stage;

/*!
 * Document provider tests entry point
 */

#[path = "provider/codec_props_test.rs"]
mod codec_props_test;

#[path = "provider/provider_test.rs"]
mod provider_test;

#[path = "provider/notification_test.rs"]
mod notification_test;

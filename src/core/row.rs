use crate::core::fields;
use crate::core::path::pluck;
use crate::domain::model::{Row, RowSchema};
use crate::utils::error::Result;
use serde_json::Value;

#[derive(Clone, Copy)]
enum Column {
    /// Dotted path copied straight from the record; absent keys become empty
    /// cells.
    Direct(&'static str),
    Derived(fn(&Value) -> String),
    Required(fn(&Value) -> Result<String>),
}

impl Column {
    fn extract(&self, record: &Value) -> Result<String> {
        match self {
            Column::Direct(path) => Ok(pluck(record, path)
                .value()
                .map(fields::scalar_string)
                .unwrap_or_default()),
            Column::Derived(extract) => Ok(extract(record)),
            Column::Required(extract) => extract(record),
        }
    }
}

fn tweet_type_cell(record: &Value) -> String {
    fields::tweet_type(record).to_string()
}

const STANDARD_COLUMNS: &[(&str, Column)] = &[
    ("id", Column::Direct("id_str")),
    ("tweet_url", Column::Required(fields::tweet_url)),
    ("created_at", Column::Direct("created_at")),
    ("user_screen_name", Column::Direct("user.screen_name")),
    ("text", Column::Required(fields::text)),
    ("tweet_type", Column::Derived(tweet_type_cell)),
    ("coordinates", Column::Derived(fields::coordinates)),
    ("place", Column::Derived(fields::place)),
    ("hashtags", Column::Derived(fields::hashtags)),
    ("media", Column::Derived(fields::media)),
    ("urls", Column::Required(fields::urls)),
    ("favorite_count", Column::Direct("favorite_count")),
    ("in_reply_to_screen_name", Column::Direct("in_reply_to_screen_name")),
    ("in_reply_to_status_id", Column::Direct("in_reply_to_status_id")),
    ("in_reply_to_user_id", Column::Direct("in_reply_to_user_id")),
    ("lang", Column::Direct("lang")),
    ("possibly_sensitive", Column::Direct("possibly_sensitive")),
    ("retweet_count", Column::Direct("retweet_count")),
    ("retweet_or_quote_id", Column::Derived(fields::retweet_id)),
    ("retweet_or_quote_screen_name", Column::Derived(fields::retweet_screen_name)),
    ("retweet_or_quote_user_id", Column::Derived(fields::retweet_user_id)),
    ("source", Column::Direct("source")),
    ("user_id", Column::Direct("user.id_str")),
    ("user_created_at", Column::Direct("user.created_at")),
    ("user_default_profile_image", Column::Direct("user.default_profile_image")),
    ("user_description", Column::Direct("user.description")),
    ("user_favourites_count", Column::Direct("user.favourites_count")),
    ("user_followers_count", Column::Direct("user.followers_count")),
    ("user_friends_count", Column::Direct("user.friends_count")),
    ("user_listed_count", Column::Direct("user.listed_count")),
    ("user_location", Column::Direct("user.location")),
    ("user_name", Column::Direct("user.name")),
    ("user_statuses_count", Column::Direct("user.statuses_count")),
    ("user_time_zone", Column::Direct("user.time_zone")),
    ("user_urls", Column::Derived(fields::user_urls)),
    ("user_verified", Column::Direct("user.verified")),
];

const EXTENDED_COLUMNS: &[(&str, Column)] = &[
    ("parsed_created_at", Column::Derived(fields::parsed_created_at)),
    ("extended_text", Column::Derived(fields::extended_text)),
    ("quote_text", Column::Derived(fields::quote_text)),
    ("all_hashtags", Column::Derived(fields::all_hashtags)),
];

fn columns(schema: RowSchema) -> impl Iterator<Item = &'static (&'static str, Column)> {
    let extra: &'static [(&'static str, Column)] = match schema {
        RowSchema::Standard => &[],
        RowSchema::Extended => EXTENDED_COLUMNS,
    };
    STANDARD_COLUMNS.iter().chain(extra.iter())
}

/// Header names in output order.
pub fn headers(schema: RowSchema) -> Vec<&'static str> {
    columns(schema).map(|(name, _)| *name).collect()
}

pub fn assemble_row(record: &Value) -> Result<Row> {
    assemble_row_with(record, RowSchema::Standard)
}

/// Builds one row in header order. The first failing required column aborts
/// the row.
pub fn assemble_row_with(record: &Value, schema: RowSchema) -> Result<Row> {
    columns(schema)
        .map(|(_, column)| column.extract(record))
        .collect()
}

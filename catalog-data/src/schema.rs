#![allow(warnings)]

table! {
    contributables (id) {
        id -> Integer,
        contributor_id -> Integer,
        owner_kind -> Text,
        owner_id -> Integer,
    }
}

table! {
    contributors (id) {
        id -> Integer,
        name -> Text,
        bio -> Nullable<Text>,
        image_url -> Nullable<Text>,
        url -> Nullable<Text>,
        twitter -> Nullable<Text>,
        facebook -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    episodes (id) {
        id -> Integer,
        season_id -> Nullable<Integer>,
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        media_url -> Nullable<Text>,
        player_url -> Nullable<Text>,
        permalink_url -> Nullable<Text>,
        published_at -> Nullable<Timestamp>,
        status -> Nullable<Text>,
        number -> Nullable<Integer>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    podcasts (id) {
        id -> Integer,
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

table! {
    seasons (id) {
        id -> Integer,
        podcast_id -> Integer,
        title -> Text,
        description -> Nullable<Text>,
        image_url -> Nullable<Text>,
        number -> Nullable<Integer>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

joinable!(contributables -> contributors (contributor_id));
joinable!(episodes -> seasons (season_id));
joinable!(seasons -> podcasts (podcast_id));

allow_tables_to_appear_in_same_query!(contributables, contributors, episodes, podcasts, seasons);

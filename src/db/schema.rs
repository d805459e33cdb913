diesel::table! {
    brands (id) {
        id -> Uuid,
        brand_name -> Varchar,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        product_name -> Varchar,
        price -> Float8,
        qty -> Float8,
        brand_id -> Uuid,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::joinable!(products -> brands (brand_id));

diesel::allow_tables_to_appear_in_same_query!(
    brands,
    products,
);

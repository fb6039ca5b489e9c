pub mod character;
pub mod country;
pub mod genre;
pub mod link;
pub mod media;
pub mod movie;
pub mod person;
pub mod prediction;
pub mod rating;
pub mod show;
pub mod title;

use sea_orm::sea_query::LikeExpr;

const LIKE_ESCAPE: char = '\\';

fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Case-insensitive whole-value match with `%` and `_` taken literally.
pub(crate) fn like_exact(value: &str) -> LikeExpr {
    LikeExpr::new(escape_like(value)).escape(LIKE_ESCAPE)
}

/// Case-insensitive substring match with `%` and `_` taken literally.
pub(crate) fn like_contains(value: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(value))).escape(LIKE_ESCAPE)
}

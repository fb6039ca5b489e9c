pub mod prelude;

pub mod characters;
pub mod countries;
pub mod genres;
pub mod movie_characters;
pub mod movie_countries;
pub mod movie_credits;
pub mod movie_genres;
pub mod movies;
pub mod people;
pub mod predictions;
pub mod ratings;
pub mod show_characters;
pub mod show_countries;
pub mod show_credits;
pub mod show_genres;
pub mod shows;

pub use super::characters::Entity as Characters;
pub use super::countries::Entity as Countries;
pub use super::genres::Entity as Genres;
pub use super::movie_characters::Entity as MovieCharacters;
pub use super::movie_countries::Entity as MovieCountries;
pub use super::movie_credits::Entity as MovieCredits;
pub use super::movie_genres::Entity as MovieGenres;
pub use super::movies::Entity as Movies;
pub use super::people::Entity as People;
pub use super::predictions::Entity as Predictions;
pub use super::ratings::Entity as Ratings;
pub use super::show_characters::Entity as ShowCharacters;
pub use super::show_countries::Entity as ShowCountries;
pub use super::show_credits::Entity as ShowCredits;
pub use super::show_genres::Entity as ShowGenres;
pub use super::shows::Entity as Shows;

// Entity Models
// Input records (businesses, countries, categories), the rows produced by
// joining them, and the three derived result tables.
//
// Every entity is a plain value: loaded once, never mutated afterwards.

pub mod business;
pub mod country;
pub mod category;
pub mod lookup;
pub mod results;

pub use business::{Business, CategorizedBusiness, EnrichedBusiness};
pub use country::Country;
pub use category::Category;
pub use lookup::{Keyed, LookupTable};
pub use results::{MissingCount, OldestBusiness, OldestByCategory};

mod user;
pub use user::{User, UserWithSnippets};

mod claims;
pub use claims::{Claims, UserData};

pub mod snippets;
pub use snippets::{Snippet, SnippetFields};

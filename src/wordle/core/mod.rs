use std::borrow::Cow;

mod guess;
pub use guess::{Guess, LetterState};

mod word;
pub use word::{ParseWordError, Word};

mod keyboard;
pub use keyboard::Keyboard;

pub trait AsEmoji {
    fn as_emoji(&self) -> Cow<str>;

    fn emoji_with_letters(&self) -> String {
        self.as_emoji().into()
    }
}

/// Named string transforms that may follow a token, e.g. `${name}.upper`.
///
/// The identity transform is not a variant; a token without a suffix carries
/// `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Capitalize,
    Title,
    Upper,
    Lower,
}

impl Transform {
    pub const ALL: [Transform; 4] = [
        Transform::Capitalize,
        Transform::Title,
        Transform::Upper,
        Transform::Lower,
    ];

    /// Looks up a transform by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Transform::Capitalize => "capitalize",
            Transform::Title => "title",
            Transform::Upper => "upper",
            Transform::Lower => "lower",
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Transform::Capitalize => capitalize(input),
            Transform::Title => title(input),
            Transform::Upper => input.to_uppercase(),
            Transform::Lower => input.to_lowercase(),
        }
    }
}

// First character upper, everything after it lower.
fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

// A letter starts a word when the character before it is not a letter.
fn title(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

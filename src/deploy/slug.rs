//! Project name generation

const ADJECTIVES: &[&str] = &[
    "able", "brave", "calm", "clever", "cool", "crisp", "eager", "fancy", "fast", "fresh",
    "gentle", "giant", "good", "grand", "happy", "honest", "jolly", "kind", "lively", "lucky",
    "mighty", "neat", "nice", "noble", "polite", "proud", "quick", "quiet", "rapid", "shiny",
    "silly", "smart", "solid", "sunny", "swift", "tender", "tidy", "upbeat", "vivid", "witty",
];

const ANIMALS: &[&str] = &[
    "ant", "bat", "bear", "bee", "bison", "cat", "crab", "crow", "deer", "dingo", "dog",
    "dove", "duck", "eagle", "eel", "elk", "emu", "falcon", "fox", "frog", "gecko", "goat",
    "goose", "hare", "hawk", "heron", "horse", "ibis", "koala", "lemur", "lion", "lynx",
    "mole", "moose", "mouse", "newt", "otter", "owl", "panda", "puma", "quail", "rabbit",
    "raven", "seal", "shark", "sloth", "snail", "swan", "tiger", "toad", "trout", "wolf",
    "yak", "zebra",
];

/// Source of fresh project names
pub trait SlugGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// `<adjective>-<animal>-<NN>` names, e.g. `tender-goose-53`
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSlug;

impl SlugGenerator for RandomSlug {
    fn generate(&self) -> String {
        let adjective = ADJECTIVES[rand::random_range(0..ADJECTIVES.len())];
        let animal = ANIMALS[rand::random_range(0..ANIMALS.len())];
        let number: u8 = rand::random_range(10..100);
        format!("{adjective}-{animal}-{number}")
    }
}

/// Always yields the same name
#[cfg(test)]
pub struct FixedSlug(pub &'static str);

#[cfg(test)]
impl SlugGenerator for FixedSlug {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_slug_shape() {
        for _ in 0..50 {
            let slug = RandomSlug.generate();
            let parts: Vec<&str> = slug.split('-').collect();
            assert_eq!(parts.len(), 3, "unexpected slug: {slug}");
            assert!(ADJECTIVES.contains(&parts[0]));
            assert!(ANIMALS.contains(&parts[1]));
            assert_eq!(parts[2].len(), 2);
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}

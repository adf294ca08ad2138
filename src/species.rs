/// Static display metadata for one kind of pet.
#[derive(Debug, PartialEq, Eq)]
pub struct Species {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Egg to final form.
    pub stages: [&'static str; 4],
    /// Same progression for terminals without emoji.
    pub ascii_stages: [&'static str; 4],
}

pub const EGG: &str = "🥚";

pub static CATALOG: [Species; 4] = [
    Species {
        id: "chicken",
        name: "Chicken",
        icon: "🐦",
        stages: ["🥚", "🐣", "🐥", "🐔"],
        ascii_stages: ["(o)", ">o", ">o)", ">O)~"],
    },
    Species {
        id: "cat",
        name: "Cat",
        icon: "🐱",
        stages: ["🥚", "😺", "😸", "😻"],
        ascii_stages: ["(o)", "=^.^=", "=^o^=", "=^w^="],
    },
    Species {
        id: "dog",
        name: "Dog",
        icon: "🐶",
        stages: ["🥚", "🐶", "🐕", "🦮"],
        ascii_stages: ["(o)", "U.U", "U^U", "U@U"],
    },
    Species {
        id: "rabbit",
        name: "Rabbit",
        icon: "🐰",
        stages: ["🥚", "🐰", "🐇", "🦘"],
        ascii_stages: ["(o)", "(\\_/)", "(='.')", "(\")_(\")"],
    },
];

pub fn find(id: &str) -> Option<&'static Species> {
    CATALOG.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_resolvable() {
        for sp in CATALOG.iter() {
            assert_eq!(find(sp.id).map(|s| s.name), Some(sp.name));
        }
        assert!(find("dragon").is_none());
    }

    #[test]
    fn every_species_starts_as_an_egg() {
        assert!(CATALOG.iter().all(|s| s.stages[0] == EGG));
    }
}

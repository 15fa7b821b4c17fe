/// Known triggers, symptoms and medications
///
/// Each list is a closed enumeration with an `Other` escape hatch for free
/// text. Values are stored as their display names, so a persisted log reads
/// the same whether an entry came from the list or was typed in.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declare a catalogue enum with canonical labels and accepted aliases
macro_rules! catalogue {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            /// Free-text entry outside the known list
            Other(String),
        }

        impl $name {
            /// Every known entry, in display order
            pub fn known() -> Vec<$name> {
                vec![$( $name::$variant ),+]
            }

            pub fn display_name(&self) -> &str {
                match self {
                    $( $name::$variant => $label, )+
                    $name::Other(text) => text,
                }
            }

            /// Case-insensitive lookup over labels and aliases
            pub fn parse(text: &str) -> Self {
                let trimmed = text.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($label) $(|| trimmed.eq_ignore_ascii_case($alias))* {
                        return $name::$variant;
                    }
                )+
                $name::Other(trimmed.to_string())
            }

            pub fn is_other(&self) -> bool {
                matches!(self, $name::Other(_))
            }

            /// The value this entry becomes after a save and reload
            ///
            /// Free text that names a known entry is folded into it.
            pub fn canonical(self) -> Self {
                match self {
                    $name::Other(text) => Self::parse(&text),
                    known => known,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.display_name())
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self::parse(text)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.display_name())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

catalogue! {
    /// Something the user believes set off an attack
    pub enum Trigger {
        Stress => "Stress",
        Light => "Light" | "Lights" | "Bright light",
        Noise => "Noise",
        PoorSleep => "Poor sleep" | "Lack of sleep" | "Sleep",
        Weather => "Weather",
        Hormonal => "Hormonal" | "Hormones",
        Alcohol => "Alcohol",
        Caffeine => "Caffeine",
        SkippedMeal => "Skipped meal" | "Hunger",
        ScreenTime => "Screen time" | "Screens",
        Dehydration => "Dehydration",
    }
}

catalogue! {
    /// Something experienced during an attack
    pub enum Symptom {
        Nausea => "Nausea",
        Vomiting => "Vomiting",
        Aura => "Aura",
        LightSensitivity => "Light sensitivity" | "Photophobia",
        SoundSensitivity => "Sound sensitivity" | "Phonophobia",
        Dizziness => "Dizziness",
        Fatigue => "Fatigue",
        NeckPain => "Neck pain",
        ThrobbingPain => "Throbbing pain",
    }
}

catalogue! {
    /// Medication category taken for an attack
    pub enum Medication {
        Triptans => "Triptans",
        Nsaids => "NSAIDs",
        Acetaminophen => "Acetaminophen" | "Paracetamol",
        AntiNausea => "Anti-nausea",
        Ergotamines => "Ergotamines",
        Ditans => "Ditans",
        Gepants => "Gepants",
        Combination => "Combination",
    }
}

//! Closed option sets offered by the intake form's select inputs.

/// Declares a select-style enum with its wire name and display label.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Comma-separated wire names, for error messages.
            pub fn options() -> String {
                Self::ALL
                    .iter()
                    .map(|choice| choice.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    pub enum FinancingStructure {
        Loan => ("loan", "Loan"),
        JointVenture => ("joint_venture", "Joint Venture"),
    }
}

choice_enum! {
    pub enum RentalStrategy {
        ShortTerm => ("str", "Short-Term Rental (STR)"),
        LongTerm => ("ltr", "Long-Term Rental (LTR)"),
        MidTerm => ("mtr", "Mid-Term Rental (MTR)"),
        Mixed => ("mixed", "Mixed Use"),
    }
}

choice_enum! {
    pub enum ArvJustification {
        Appraisal => ("appraisal", "Professional Appraisal"),
        Comparables => ("comparables", "3 Comparable Sales"),
        BrokerPriceOpinion => ("bpo", "Broker Price Opinion (BPO)"),
    }
}

choice_enum! {
    #[derive(Default)]
    pub enum CreditScoreRange {
        #[default]
        Under600 => ("under_600", "Under 600"),
        From600To649 => ("600_649", "600 - 649"),
        From650To699 => ("650_699", "650 - 699"),
        From700To749 => ("700_749", "700 - 749"),
        From750 => ("750_plus", "750+"),
    }
}

choice_enum! {
    pub enum LandZoning {
        Agricultural => ("agricultural", "Agricultural (AG)"),
        ResidentialRural => ("residential_rural", "Residential – Rural (RR)"),
        ResidentialSingleFamily => ("residential_single_family", "Residential – Single Family (R1)"),
        ResidentialMultiFamily => ("residential_multi_family", "Residential – Multi-Family (R2/R3/RM)"),
        Commercial => ("commercial", "Commercial (C)"),
        Industrial => ("industrial", "Industrial (I)"),
        Recreational => ("recreational", "Recreational (REC)"),
        Timber => ("timber", "Timber (T)"),
        VacantUnzoned => ("vacant_unzoned", "Vacant / Unzoned"),
        MixedUse => ("mixed_use", "Mixed Use (MU)"),
        MobileHome => ("mobile_home", "Mobile Home / Manufactured Housing"),
        Conservation => ("conservation", "Conservation / Protected Land"),
        PlannedDevelopment => ("planned_development", "Planned Development (PD)"),
        Other => ("other", "Other (please specify)"),
    }
}

choice_enum! {
    pub enum RoadAccess {
        Paved => ("paved", "Paved"),
        Dirt => ("dirt", "Dirt"),
        Easement => ("easement", "Easement"),
        NoAccess => ("none", "None"),
        Unknown => ("unknown", "Unknown"),
    }
}

//! Wizard steps and their preconditions

use serde::{Deserialize, Serialize};

use crate::draft::BookingDraft;

/// Steps of the booking wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Contact details; creates the customer.
    Contact,
    /// Location selection.
    Location,
    /// Theater and slot selection.
    Theater,
    /// Occasion and nicknames.
    Occasion,
    /// Cakes.
    Cakes,
    /// Add-ons.
    Addons,
    /// Recap and coupon.
    Confirmation,
    /// Payment.
    Payment,
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WizardStep::Contact => "contact",
            WizardStep::Location => "location",
            WizardStep::Theater => "theater",
            WizardStep::Occasion => "occasion",
            WizardStep::Cakes => "cakes",
            WizardStep::Addons => "addons",
            WizardStep::Confirmation => "confirmation",
            WizardStep::Payment => "payment",
        })
    }
}

/// Draft fields a step may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    /// Customer identifier.
    Customer,
    /// Selected location.
    Location,
    /// Selected theater.
    Theater,
    /// Selected slot and date.
    Slot,
    /// Selected occasion.
    Occasion,
    /// Computed payable amount.
    FinalPrice,
}

impl DraftField {
    /// The step that populates this field.
    pub fn populated_by(self) -> WizardStep {
        match self {
            DraftField::Customer => WizardStep::Contact,
            DraftField::Location => WizardStep::Location,
            DraftField::Theater | DraftField::Slot => WizardStep::Theater,
            DraftField::Occasion => WizardStep::Occasion,
            DraftField::FinalPrice => WizardStep::Confirmation,
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DraftField::Customer => "customer",
            DraftField::Location => "location",
            DraftField::Theater => "theater",
            DraftField::Slot => "slot",
            DraftField::Occasion => "occasion",
            DraftField::FinalPrice => "final price",
        })
    }
}

const SELECTION: [DraftField; 4] = [
    DraftField::Customer,
    DraftField::Location,
    DraftField::Theater,
    DraftField::Slot,
];

impl WizardStep {
    /// Every step, in order.
    pub const ALL: [WizardStep; 8] = [
        WizardStep::Contact,
        WizardStep::Location,
        WizardStep::Theater,
        WizardStep::Occasion,
        WizardStep::Cakes,
        WizardStep::Addons,
        WizardStep::Confirmation,
        WizardStep::Payment,
    ];

    /// Fields that must be populated before this step can render.
    pub fn preconditions(self) -> &'static [DraftField] {
        match self {
            WizardStep::Contact => &[],
            WizardStep::Location => &[DraftField::Customer],
            WizardStep::Theater => &[DraftField::Customer, DraftField::Location],
            WizardStep::Occasion | WizardStep::Cakes | WizardStep::Addons => &SELECTION,
            WizardStep::Confirmation => &[
                DraftField::Customer,
                DraftField::Location,
                DraftField::Theater,
                DraftField::Slot,
                DraftField::Occasion,
            ],
            WizardStep::Payment => &[
                DraftField::FinalPrice,
                DraftField::Customer,
                DraftField::Theater,
                DraftField::Location,
                DraftField::Slot,
            ],
        }
    }

    /// First unmet precondition and the step to redirect to for it.
    pub fn first_unmet(self, draft: &BookingDraft) -> Option<(DraftField, WizardStep)> {
        self.preconditions()
            .iter()
            .find(|field| !draft.has(**field))
            .map(|field| (*field, field.populated_by()))
    }

    /// Step that follows this one.
    pub fn next(self) -> Option<WizardStep> {
        Self::ALL
            .iter()
            .skip_while(|step| **step != self)
            .nth(1)
            .copied()
    }

    /// Client route the step renders at.
    pub fn path(self) -> &'static str {
        match self {
            WizardStep::Contact => "/book-now",
            WizardStep::Location => "/locations",
            WizardStep::Theater => "/theaters",
            WizardStep::Occasion => "/occasions",
            WizardStep::Cakes => "/cakes",
            WizardStep::Addons => "/addons",
            WizardStep::Confirmation => "/confirmation",
            WizardStep::Payment => "/payment",
        }
    }
}

//! Payment status codes reported in payment subjects.

/// Label the sender uses for a finished payment.
pub const COMPLETE_LABEL: &str = "Complete";

/// Status code to label table.
const PAYMENT_STATUSES: [(u32, &str); 6] = [
    (1, COMPLETE_LABEL),
    (2, "Refund"),
    (3, "Chargeback"),
    (18, "Declined"),
    (19, "Pending Checkout"),
    (21, "Refund Pending"),
];

/// Looks up the label for a payment status code.
pub fn label_for(code: u32) -> Option<&'static str> {
    PAYMENT_STATUSES
        .iter()
        .find(|(id, _)| *id == code)
        .map(|(_, label)| *label)
}

/// True when `code` maps to the "Complete" label.
pub fn is_complete(code: u32) -> bool {
    label_for(code) == Some(COMPLETE_LABEL)
}

//! Invoice line items and totals derivation
//!
//! Pure recompute-on-change functions: every edit rebuilds the affected
//! values from scratch rather than patching cached state. Whether an invoice
//! is submittable (non-empty items, named party, positive prices) is the
//! caller's policy; these functions only compute.

use serde::{Deserialize, Serialize};

use crate::money;

/// A single sale/purchase form row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Row identifier, unique within one invoice
    #[serde(default)]
    pub id: String,
    /// Item description
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub unit_price: f64,
    /// Row total; `quantity * unit_price` immediately after a recompute
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub amount: f64,
}

impl LineItem {
    /// Create a row with a consistent amount
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        let quantity = money::coerce_non_negative(quantity);
        let unit_price = money::coerce_non_negative(unit_price);
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            unit_price,
            amount: quantity * unit_price,
        }
    }
}

/// Which of the three mutually derived fields the user just edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Quantity,
    UnitPrice,
    Amount,
}

impl std::str::FromStr for ItemField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantity" | "qty" => Ok(ItemField::Quantity),
            "unit_price" | "unitPrice" | "price" => Ok(ItemField::UnitPrice),
            "amount" => Ok(ItemField::Amount),
            _ => Err(format!("Invalid item field: {}", s)),
        }
    }
}

impl std::fmt::Display for ItemField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemField::Quantity => write!(f, "quantity"),
            ItemField::UnitPrice => write!(f, "unit_price"),
            ItemField::Amount => write!(f, "amount"),
        }
    }
}

/// Apply one field edit and recompute the other derived fields
///
/// Editing quantity or unit price re-derives the amount; editing the amount
/// back-derives the unit price (guarding division by zero) and leaves the
/// quantity untouched. The incoming value is coerced (NaN/negative -> 0), so
/// this never fails.
pub fn update_line_item(item: &LineItem, field: ItemField, value: f64) -> LineItem {
    let value = money::coerce_non_negative(value);
    let mut updated = item.clone();

    match field {
        ItemField::Quantity => {
            updated.quantity = value;
            updated.amount = updated.quantity * updated.unit_price;
        }
        ItemField::UnitPrice => {
            updated.unit_price = value;
            updated.amount = updated.quantity * updated.unit_price;
        }
        ItemField::Amount => {
            updated.amount = value;
            updated.unit_price = if updated.quantity != 0.0 {
                updated.amount / updated.quantity
            } else {
                0.0
            };
        }
    }

    updated
}

/// How the paid amount is determined for an invoice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentPolicy {
    /// When true the entire grand total is considered paid and `tendered`
    /// is ignored
    #[serde(default)]
    pub full_payment: bool,
    /// Manually entered paid amount, used when `full_payment` is false
    #[serde(default, deserialize_with = "money::de_coerced_f64")]
    pub tendered: f64,
}

impl Default for PaymentPolicy {
    fn default() -> Self {
        Self {
            full_payment: true,
            tendered: 0.0,
        }
    }
}

impl PaymentPolicy {
    /// Full payment: paid amount tracks the grand total
    pub fn full() -> Self {
        Self { full_payment: true, tendered: 0.0 }
    }

    /// Partial payment with a manually entered amount
    pub fn partial(tendered: f64) -> Self {
        Self { full_payment: false, tendered }
    }
}

/// Derived invoice totals
///
/// Invariant after every recompute: `paid_amount + balance_due ==
/// grand_total` within floating-point tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub discount_percent: f64,
    pub tax_percent: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub grand_total: f64,
    pub paid_amount: f64,
    pub balance_due: f64,
}

/// Recompute the full totals record from scratch
///
/// Discount applies to the subtotal; tax applies to the discounted base.
/// A tendered amount above the grand total is clamped silently rather than
/// rejected — overpayment handling is a caller concern.
pub fn compute_invoice_totals(
    items: &[LineItem],
    discount_percent: Option<f64>,
    tax_percent: Option<f64>,
    policy: &PaymentPolicy,
) -> InvoiceTotals {
    let discount_percent = money::coerce(discount_percent.unwrap_or(0.0));
    let tax_percent = money::coerce(tax_percent.unwrap_or(0.0));

    let subtotal: f64 = items.iter().map(|item| money::coerce(item.amount)).sum();
    let discount_amount = subtotal * discount_percent / 100.0;
    let taxable_base = subtotal - discount_amount;
    let tax_amount = taxable_base * tax_percent / 100.0;
    let grand_total = taxable_base + tax_amount;

    let paid_amount = if policy.full_payment {
        grand_total
    } else {
        money::coerce(policy.tendered).max(0.0).min(grand_total)
    };
    let balance_due = grand_total - paid_amount;

    InvoiceTotals {
        subtotal,
        discount_percent,
        tax_percent,
        discount_amount,
        tax_amount,
        grand_total,
        paid_amount,
        balance_due,
    }
}

// ==================== Tests ====================

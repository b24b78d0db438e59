use chrono::{Datelike, Utc};
use clashhub_api::{Address, Cart, CouponDiscovery, OrderRequest};

/// Cart view state. The cart record is server-computed and replaced wholesale
/// by every mutation response; nothing here recalculates totals.
#[derive(Debug, Default)]
pub struct CartState {
    pub cart: Cart,
    pub offers: CouponDiscovery,
    pub error: Option<String>,
}

impl CartState {
    pub fn update(&mut self, cart: Cart) {
        self.error = None;
        self.cart = cart;
    }

    pub fn offers_loaded(&mut self, offers: CouponDiscovery) {
        self.offers = offers;
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn is_empty(&self) -> bool {
        self.cart.lines.is_empty()
    }

    /// Auto-applied "best deal" coupons cannot be removed by hand.
    pub fn can_remove_coupon(&self) -> bool {
        self.cart
            .applied_coupon
            .as_ref()
            .is_some_and(|c| !c.automatic)
    }
}

// ---------------------------------------------------------------------------
// Checkout wizard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutStep {
    #[default]
    Address,
    Payment,
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard { number: String, name: String, expiry: String, cvc: String },
    CashOnDelivery,
}

impl PaymentMethod {
    /// Client-side plausibility checks only; the backend never sees card
    /// details, just the chosen method.
    pub fn validate(&self) -> Vec<String> {
        let PaymentMethod::CreditCard { number, name, expiry, cvc } = self else {
            return Vec::new();
        };
        let mut errors = Vec::new();
        if !luhn_valid(number) {
            errors.push("Card number is invalid.".into());
        }
        if name.trim().is_empty() {
            errors.push("Name on card is required.".into());
        }
        if !expiry_valid(expiry) {
            errors.push("Expiry must be MM/YY and not in the past.".into());
        }
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            errors.push("CVC must be 3 or 4 digits.".into());
        }
        errors
    }

    fn wire_name(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard { .. } => "CREDIT_CARD",
            PaymentMethod::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

/// Three-step checkout: pick an address, pick a payment method, review.
/// `advance` refuses to move past an incomplete step.
#[derive(Debug, Default)]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub addresses: Vec<Address>,
    pub selected_address: Option<u64>,
    pub payment: Option<PaymentMethod>,
    pub payment_errors: Vec<String>,
}

impl CheckoutState {
    pub fn addresses_loaded(&mut self, addresses: Vec<Address>) {
        if let Some(id) = self.selected_address
            && !addresses.iter().any(|a| a.id == id)
        {
            self.selected_address = None;
        }
        self.addresses = addresses;
    }

    pub fn select_address(&mut self, id: u64) {
        if self.addresses.iter().any(|a| a.id == id) {
            self.selected_address = Some(id);
        }
    }

    pub fn set_payment(&mut self, payment: PaymentMethod) {
        self.payment_errors.clear();
        self.payment = Some(payment);
    }

    pub fn advance(&mut self) -> bool {
        match self.step {
            CheckoutStep::Address => {
                if self.selected_address.is_none() {
                    return false;
                }
                self.step = CheckoutStep::Payment;
                true
            }
            CheckoutStep::Payment => {
                let Some(payment) = &self.payment else {
                    self.payment_errors = vec!["Choose a payment method.".into()];
                    return false;
                };
                self.payment_errors = payment.validate();
                if !self.payment_errors.is_empty() {
                    return false;
                }
                self.step = CheckoutStep::Review;
                true
            }
            CheckoutStep::Review => false,
        }
    }

    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Address | CheckoutStep::Payment => CheckoutStep::Address,
            CheckoutStep::Review => CheckoutStep::Payment,
        };
    }

    /// The order body, available only once the wizard reached the review
    /// step with everything filled in.
    pub fn order_request(&self) -> Option<OrderRequest> {
        if self.step != CheckoutStep::Review {
            return None;
        }
        Some(OrderRequest {
            address_id: self.selected_address?,
            payment_method: self.payment.as_ref()?.wire_name().to_owned(),
        })
    }

    pub fn reset(&mut self) {
        self.step = CheckoutStep::Address;
        self.selected_address = None;
        self.payment = None;
        self.payment_errors.clear();
    }
}

fn luhn_valid(number: &str) -> bool {
    let digits: Vec<u32> = number
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .unwrap_or_default();
    if !(13..=19).contains(&digits.len()) {
        return false;
    }
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn expiry_valid(expiry: &str) -> bool {
    let Some((month, year)) = expiry.split_once('/') else {
        return false;
    };
    let (Ok(month), Ok(year)) = (month.parse::<u32>(), year.parse::<u32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) || year > 99 {
        return false;
    }
    let year = 2000 + year as i32;
    let now = Utc::now();
    (year, month) >= (now.year(), now.month())
}

//! Common constants for the provider API and checkout defaults

/// Provider endpoints and defaults
pub mod provider {
    /// Mercado Pago public API base URL
    pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";
    /// Preference creation path
    pub const PREFERENCES_PATH: &str = "/checkout/preferences";
    /// Payment lookup path (the payment id is appended)
    pub const PAYMENTS_PATH: &str = "/v1/payments";
    /// Header carrying the per-request idempotency key
    pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";
}

/// Checkout defaults
pub mod checkout {
    /// Argentine peso
    pub const DEFAULT_CURRENCY: &str = "ARS";
    /// Frontend that receives the checkout redirects
    pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3001";
    /// Frontend route the redirects land on
    pub const CART_PATH: &str = "/carrito";
    /// Redirect back automatically once the payment is approved
    pub const AUTO_RETURN_APPROVED: &str = "approved";
    /// Message returned when the cart is missing or empty
    pub const EMPTY_CART_MESSAGE: &str = "The cart is empty.";
}

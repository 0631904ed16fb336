//! User-facing texts.

use rust_decimal::Decimal;

use crate::payments::PaymentError;

pub const WELCOME: &str = "Bienvenue sur CASH_CENTER ! Utilisez /buy <montant en EUR> pour effectuer un paiement (minimum 0,25€).";
pub const AMOUNT_MISSING: &str = "Veuillez spécifier un montant. Exemple : /buy 10";
pub const AMOUNT_INVALID: &str = "Montant invalide. Veuillez entrer un nombre valide.";
pub const AMOUNT_BELOW_MINIMUM: &str = "Le montant minimum est de 0,25€.";
pub const ASK_CONTACT: &str =
    "Veuillez indiquer l'adresse e-mail à laquelle le reçu de paiement sera envoyé.";
pub const PAYMENT_RECEIVED: &str = "Votre paiement a été reçu avec succès ! Merci.";
pub const RATE_UNAVAILABLE: &str =
    "Erreur: le taux de conversion est indisponible, veuillez réessayer plus tard.";

pub fn payment_link(fiat_amount: Decimal, crypto_amount: Decimal, checkout_url: &str) -> String {
    format!("Payez {fiat_amount}€ (≈ {crypto_amount} USDT) ici : {checkout_url}")
}

pub fn payment_error(error: &PaymentError) -> String {
    match error {
        PaymentError::RateUnavailable => RATE_UNAVAILABLE.to_string(),
        PaymentError::Processor(message) => format!("Erreur: {message}"),
    }
}

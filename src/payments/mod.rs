//! Card payment confirmation.
//! `gateway` is the seam over the external payment processor; `flow` is the
//! explicit state machine that walks one donation from amount entry through
//! intent, method creation, confirmation and recording.

pub mod flow;
pub mod gateway;

pub use flow::{DonationFlow, FlowState, HttpPaymentsBackend, PaymentsBackend, SubmitOutcome};
pub use gateway::{
    BillingDetails, CardDetails, ConfirmOutcome, ConfirmStatus, GatewayError, HttpPaymentGateway,
    PaymentGateway,
};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::{DonationError, GatewayError, ValidationError};

impl IntoResponse for DonationError {
    fn into_response(self) -> Response {
        let status = match &self {
            DonationError::Validation(
                ValidationError::AmountBelowMinimum { .. }
                | ValidationError::AmountAboveMaximum { .. },
            ) => StatusCode::BAD_REQUEST,
            DonationError::Validation(_) => StatusCode::NOT_FOUND,
            DonationError::Gateway(GatewayError::SignatureVerification) => StatusCode::BAD_REQUEST,
            DonationError::Gateway(_) => StatusCode::BAD_GATEWAY,
            DonationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

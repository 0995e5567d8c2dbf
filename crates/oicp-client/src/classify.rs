//! Response classifier
//!
//! Turns every transport outcome into exactly one of `Success`,
//! `DomainFault` or `TransportFault`:
//!
//! | Outcome                              | Result                          |
//! |--------------------------------------|---------------------------------|
//! | network error / timeout              | `TransportFault` 320            |
//! | cancellation                         | `TransportFault` 990            |
//! | non-2xx HTTP                         | `TransportFault` 022            |
//! | 2xx with SOAP fault                  | `DomainFault` (status of fault) |
//! | 2xx with the expected message        | `Success`                       |
//! | 2xx with an undecodable body         | `TransportFault` 022            |
//!
//! A message whose own `Result` flag is false is still `Success`.

use oicp_codec::{decode, Decoded, OicpMessage};
use oicp_core::{FaultCause, OperationResult, StatusCode, StatusCodes};

use crate::error::TransportError;
use crate::transport::HttpResponse;

/// Classify the outcome of one exchange
pub fn classify<M: OicpMessage>(
    outcome: Result<HttpResponse, TransportError>,
) -> OperationResult<M> {
    let response = match outcome {
        Ok(response) => response,
        Err(error) => return transport_failure(error),
    };

    if !response.is_success() {
        let reason = if response.reason.is_empty() {
            format!("HTTP {}", response.status)
        } else {
            response.reason
        };
        let mut status = StatusCode::bare(StatusCodes::DataError).with_description(reason);
        if !response.body.is_empty() {
            status = status.with_additional_info(response.body);
        }
        return OperationResult::transport_fault(status, FaultCause::HttpStatus(response.status));
    }

    match decode::<M>(&response.body) {
        Ok(Decoded::Message(message)) => OperationResult::Success(message),
        Ok(Decoded::Fault(fault)) => OperationResult::DomainFault(fault.status_code()),
        Err(error) => OperationResult::transport_fault(
            StatusCode::new(StatusCodes::DataError).with_additional_info(error.to_string()),
            FaultCause::Decode(error.to_string()),
        ),
    }
}

/// Locally synthesized fault for a call that never produced a response
pub fn transport_failure<M>(error: TransportError) -> OperationResult<M> {
    match error {
        TransportError::Network(message) => OperationResult::transport_fault(
            StatusCode::bare(StatusCodes::ServiceNotAvailable).with_description(message.clone()),
            FaultCause::Network(message),
        ),
        TransportError::Timeout(after) => OperationResult::transport_fault(
            StatusCode::bare(StatusCodes::ServiceNotAvailable)
                .with_description(TransportError::Timeout(after).to_string()),
            FaultCause::Timeout(after),
        ),
        TransportError::Cancelled => OperationResult::transport_fault(
            StatusCode::new(StatusCodes::RequestCancelled),
            FaultCause::Cancelled,
        ),
    }
}

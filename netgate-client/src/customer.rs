//! CustomerLink: stored customer profiles
//!
//! ACH/EFT profiles exist on the NA server only.

use crate::{LinkClient, Result};
use netgate_core::operation::*;
use netgate_core::{ClassifiedResult, Parameters};

/// CustomerLink facade
#[derive(Debug, Clone)]
pub struct CustomerLink {
    client: LinkClient,
}

impl CustomerLink {
    /// Facade over a client
    pub fn new(client: LinkClient) -> Self {
        Self { client }
    }

    /// Underlying client
    pub fn client(&self) -> &LinkClient {
        &self.client
    }

    /// Profile details for a customer code
    pub async fn get_customer_code_detail(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CUSTOMER_CODE_DETAIL, params).await
    }

    /// Store a credit card profile, optionally with a recurring schedule
    pub async fn create_credit_card_customer_code(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&CREATE_CREDIT_CARD_CUSTOMER_CODE, params).await
    }

    /// Update a credit card profile
    pub async fn update_credit_card_customer_code(
        &self,
        params: Parameters,
    ) -> Result<ClassifiedResult> {
        self.client.invoke(&UPDATE_CREDIT_CARD_CUSTOMER_CODE, params).await
    }

    /// Store a bank account profile (NA only)
    pub async fn create_acheft_customer_code(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&CREATE_ACHEFT_CUSTOMER_CODE, params).await
    }

    /// Update a bank account profile (NA only)
    pub async fn update_acheft_customer_code(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&UPDATE_ACHEFT_CUSTOMER_CODE, params).await
    }

    /// Delete a stored profile
    pub async fn delete_customer_code(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&DELETE_CUSTOMER_CODE, params).await
    }

    /// Customers with recurring schedules
    pub async fn get_customer_list(&self, params: Parameters) -> Result<ClassifiedResult> {
        self.client.invoke(&GET_CUSTOMER_LIST, params).await
    }
}

//! ABI bindings for the delayed transaction module and the Safe it is attached to.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::codec::AnnouncementDetails;

sol! {
    /// Delayed transaction module.
    interface IDelayedTxModule {
        /// A safe changed the delay of one of its announcers. Delay zero removes it.
        #[derive(Debug, PartialEq, Eq)]
        event UpdatedConfig(address indexed executor, address indexed announcer, uint64 delay, bool requireExecutor);

        /// An announcer scheduled a transaction for a safe.
        #[derive(Debug, PartialEq, Eq)]
        event NewAnnouncement(address indexed executor, address indexed announcer, bytes32 txHash);

        function NAME() external view returns (string memory);

        function announcements(bytes32 txHash) external view returns (address executor, uint64 execTime, bool requiresExecutor, bool executed);

        function generateTransactionHashData(address executor, address to, uint256 value, bytes calldata data, uint8 operation, uint256 nonce) external view returns (bytes memory);

        function announceTransaction(address executor, address to, uint256 value, bytes calldata data, uint8 operation, uint256 nonce) external;

        function executeTransaction(address executor, address to, uint256 value, bytes calldata data, uint8 operation, uint256 nonce) external;

        function updateConfig(address announcer, uint64 delay, bool requireExecutor) external;
    }

    /// Subset of the Safe owner and module manager.
    interface ISafe {
        function addOwnerWithThreshold(address owner, uint256 _threshold) external;

        function enableModule(address module) external;

        function isModuleEnabled(address module) external view returns (bool);
    }
}

/// Calldata for `announceTransaction(details)`.
pub fn announce_transaction(details: &AnnouncementDetails) -> Bytes {
    IDelayedTxModule::announceTransactionCall {
        executor: details.executor,
        to: details.to,
        value: details.value,
        data: details.data.clone(),
        operation: details.operation.into(),
        nonce: details.nonce,
    }
    .abi_encode()
    .into()
}

/// Calldata for `executeTransaction(details)`.
pub fn execute_transaction(details: &AnnouncementDetails) -> Bytes {
    IDelayedTxModule::executeTransactionCall {
        executor: details.executor,
        to: details.to,
        value: details.value,
        data: details.data.clone(),
        operation: details.operation.into(),
        nonce: details.nonce,
    }
    .abi_encode()
    .into()
}

/// Calldata for `generateTransactionHashData(details)`.
pub fn generate_transaction_hash_data(details: &AnnouncementDetails) -> Bytes {
    IDelayedTxModule::generateTransactionHashDataCall {
        executor: details.executor,
        to: details.to,
        value: details.value,
        data: details.data.clone(),
        operation: details.operation.into(),
        nonce: details.nonce,
    }
    .abi_encode()
    .into()
}

/// Calldata for `updateConfig(announcer, delay, requireExecutor)`.
pub fn update_config(announcer: Address, delay: u64, require_executor: bool) -> Bytes {
    IDelayedTxModule::updateConfigCall {
        announcer,
        delay,
        requireExecutor: require_executor,
    }
    .abi_encode()
    .into()
}

/// Calldata for the Safe's `addOwnerWithThreshold(owner, threshold)`.
pub fn add_owner_with_threshold(owner: Address, threshold: u64) -> Bytes {
    ISafe::addOwnerWithThresholdCall {
        owner,
        _threshold: U256::from(threshold),
    }
    .abi_encode()
    .into()
}

/// Calldata for the Safe's `enableModule(module)`.
pub fn enable_module(module: Address) -> Bytes {
    ISafe::enableModuleCall { module }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Operation;
    use alloy::primitives::address;

    #[test]
    fn test_update_config_selector() {
        let data = update_config(Address::ZERO, 60, true);
        assert_eq!(&data[..4], &IDelayedTxModule::updateConfigCall::SELECTOR);
        assert_eq!(data.len(), 4 + 3 * 32);
        // delay is the second word
        assert_eq!(data[4 + 63], 60);
        assert_eq!(data[4 + 95], 1);
    }

    #[test]
    fn test_announce_and_execute_share_arguments() {
        let details = AnnouncementDetails {
            executor: address!("00000000000000000000000000000000000000aa"),
            to: address!("00000000000000000000000000000000000000aa"),
            value: U256::ZERO,
            data: Bytes::new(),
            operation: Operation::Call,
            nonce: U256::from(1_710_000_000_000u64),
        };
        let announce = announce_transaction(&details);
        let execute = execute_transaction(&details);
        assert_ne!(announce[..4], execute[..4]);
        assert_eq!(announce[4..], execute[4..]);

        let decoded = IDelayedTxModule::executeTransactionCall::abi_decode(&execute).unwrap();
        assert_eq!(decoded.nonce, details.nonce);
        assert_eq!(decoded.operation, 0);
    }

    #[test]
    fn test_add_owner_threshold_one() {
        let owner = address!("00000000000000000000000000000000000000bb");
        let data = add_owner_with_threshold(owner, 1);
        let decoded = ISafe::addOwnerWithThresholdCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.owner, owner);
        assert_eq!(decoded._threshold, U256::from(1));
    }
}

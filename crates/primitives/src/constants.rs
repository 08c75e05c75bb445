//! Account abstraction (ERC-4337)-related constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";
}

/// Safe multi-signature module
pub mod safe {
    /// Safe 4337 module, the verifying contract of the module's EIP-712 domain
    pub const MODULE_ADDRESS: &str = "0xa581c4A4DB7175302464fF3C06380BC3270b4037";
    /// MultiSendCallOnly helper that wrapped calls are delegated to
    pub const MULTI_SEND_ADDRESS: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";
}

/// Fee estimation
pub mod fees {
    /// The suggested priority fee is padded by `fee / FEE_BUFFER_DIVISOR`
    pub const FEE_BUFFER_DIVISOR: u64 = 1300;
}

/// Hierarchical key derivation
pub mod derivation {
    /// BIP-44 Ethereum derivation path, the account index is appended
    pub const PATH_PREFIX: &str = "m/44'/60'/0'/0/";
}

use ethers::contract::abigen;

abigen!(
    SimpleAccountAPI,
    r#"[
        function execute(address dest, uint256 value, bytes calldata func) external
        function executeBatch(address[] calldata dest, uint256[] calldata value, bytes[] calldata func) external
    ]"#
);

abigen!(
    SafeModuleAPI,
    r#"[
        function executeUserOpWithErrorString(address[] calldata to, uint256 value, bytes calldata data, uint256 operation) external
    ]"#
);

abigen!(
    MultiSendAPI,
    r#"[
        function multiSend(bytes memory transactions) external payable
    ]"#
);

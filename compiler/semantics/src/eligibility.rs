//! Which messages get a generated permission matrix.

use ir::MessageDefinition;

/// Whether permission matrix tests are generated for a message
pub fn is_test_eligible(message: &MessageDefinition) -> bool {
    message.generate_cud_test && !message.generate_show_test
}

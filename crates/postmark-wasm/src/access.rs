//! Role checks for UI gating.
//!
//! Role strings come straight from the login response; unknown or missing
//! roles are treated as `viewer`.

use postmark_core::permissions::{self, Permission};
use postmark_core::{Role, Session};
use wasm_bindgen::prelude::*;

/// Whether `role` holds `permission` (e.g. `"images_upload"`).
/// Unknown permissions are denied.
#[wasm_bindgen]
pub fn has_permission(role: Option<String>, permission: &str) -> bool {
    let role = Role::parse_or_viewer(role.as_deref());
    permission
        .parse::<Permission>()
        .is_ok_and(|permission| permissions::has_permission(role, permission))
}

/// Whether `role` may open a dashboard route. Unknown routes are denied.
#[wasm_bindgen]
pub fn can_access_route(role: Option<String>, route: &str) -> bool {
    permissions::can_access_route(Role::parse_or_viewer(role.as_deref()), route)
}

/// Tenant code new records should be written under.
///
/// `session` is `{ username, role, tenantCode }`; `selected` is the tenant
/// picked in the switcher, honoured only for master admins.
#[wasm_bindgen]
pub fn effective_tenant(session: JsValue, selected: Option<String>) -> Result<String, JsValue> {
    let session: Session = serde_wasm_bindgen::from_value(session).map_err(crate::to_js)?;
    Ok(session.effective_tenant(selected.as_deref()).to_string())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_effective_tenant_master_admin() {
        let session = serde_wasm_bindgen::to_value(&Session::new("root", Role::MasterAdmin, "")).unwrap();
        assert_eq!(effective_tenant(session, Some("ACME".into())).unwrap(), "ACME");
    }

    #[wasm_bindgen_test]
    fn test_effective_tenant_pinned() {
        let session = serde_wasm_bindgen::to_value(&Session::new("e", Role::Editor, "T1")).unwrap();
        assert_eq!(effective_tenant(session, Some("ACME".into())).unwrap(), "T1");
    }
}

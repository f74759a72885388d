#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Generator output for `fixtures/request.json`, compiled as a crate.
//!
//! `build.rs` writes one directory per mode under `OUT_DIR`. The modules
//! below include those files at the paths generated code imports from
//! (`crate::edgeproto`, `crate::ormapi`, `crate::mctestclient` and
//! `crate::testutil`) and mirror the `mod.rs` the generator writes next to them.

pub mod edgeproto;

macro_rules! generated {
    ($mode:literal, $file:literal) => {
        include!(concat!(env!("OUT_DIR"), "/", $mode, "/", $file, ".rs"));
    };
}

/// Gateway handlers, backend traits and the dispatcher
pub mod orm {
    pub mod widget {
        generated!("orm", "widget");
    }
    pub mod cluster {
        generated!("orm", "cluster");
    }
    pub use cluster::*;
    pub use widget::*;
}

/// Region wrapper structs
pub mod ormapi {
    pub mod widget {
        generated!("ormapi", "widget");
    }
    pub mod cluster {
        generated!("ormapi", "cluster");
    }
    pub use cluster::*;
    pub use widget::*;
}

/// Client bindings
pub mod mctestclient {
    pub mod widget {
        generated!("mctestclient", "widget");
    }
    pub mod cluster {
        generated!("mctestclient", "cluster");
    }
    pub use cluster::*;
    pub use widget::*;
}

/// Test request helpers
pub mod testutil {
    pub mod widget {
        generated!("testutil", "widget");
    }
    pub mod cluster {
        generated!("testutil", "cluster");
    }
    pub use cluster::*;
    pub use widget::*;
}

/// Permission tests
pub mod permtest {
    pub mod widget {
        generated!("permtest", "widget");
    }
    pub mod cluster {
        generated!("permtest", "cluster");
    }
    pub use cluster::*;
    pub use widget::*;
}

//! Rust-friendly UEFI Variable Runtime Service Wrappers
//!
//! Provides safe and unsafe wrappers for the read side of the UEFI variable services. Consumers depend on the
//! [`RuntimeServices`] trait rather than on a global table pointer so the variable store can be swapped for a mock or
//! an in-memory implementation in tests.
//!
//! ```ignore
//! pub static RUNTIME_SERVICES: StandardRuntimeServices =
//!     StandardRuntimeServices::new(&(*runtime_services_ptr));
//! let (size, attributes) = RUNTIME_SERVICES.get_variable_size_and_attributes(&name, &guid)?;
//! ```
//!

#![cfg_attr(all(not(test), not(feature = "mockall")), no_std)]

extern crate alloc;

/// Variable-services-specific structs and utilities
pub mod variable_services;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

use core::{
    ffi::c_void,
    fmt::Debug,
    ptr,
    sync::atomic::{AtomicPtr, Ordering},
};

use r_efi::efi;
use variable_services::GetVariableStatus;

/// The UEFI spec runtime services.
/// Wrapper around [`efi::RuntimeServices`]
///
/// UEFI Spec Documentation: [8. Services - RuntimeServices](https://uefi.org/specs/UEFI/2.10/08_Services_Runtime_Services.html)
pub struct StandardRuntimeServices {
    efi_runtime_services: AtomicPtr<efi::RuntimeServices>,
}

impl StandardRuntimeServices {
    /// Create a new StandardRuntimeServices with the provided [efi::RuntimeServices].
    pub fn new(efi_runtime_services: &efi::RuntimeServices) -> Self {
        let this = StandardRuntimeServices::new_uninit();
        this.init(efi_runtime_services);
        this
    }

    /// Create a new StandardRuntimeServices that is not initialized.
    pub const fn new_uninit() -> Self {
        Self { efi_runtime_services: AtomicPtr::new(ptr::null_mut()) }
    }

    /// Initialize the StandardRuntimeServices.
    pub fn init(&self, efi_runtime_services: &efi::RuntimeServices) {
        self.efi_runtime_services.store(efi_runtime_services as *const _ as *mut _, Ordering::Relaxed);
    }

    /// Return true if StandardRuntimeServices is initialized.
    pub fn is_init(&self) -> bool {
        !self.efi_runtime_services.load(Ordering::Relaxed).is_null()
    }

    fn efi_runtime_services(&self) -> &efi::RuntimeServices {
        // SAFETY: Runtime services lifetime is expected to live long enough.
        unsafe { self.efi_runtime_services.load(Ordering::Relaxed).as_ref() }
            .expect("Standard Runtime Services is not initialized!")
    }
}

impl AsRef<StandardRuntimeServices> for StandardRuntimeServices {
    fn as_ref(&self) -> &StandardRuntimeServices {
        self
    }
}

impl Clone for StandardRuntimeServices {
    fn clone(&self) -> Self {
        Self { efi_runtime_services: AtomicPtr::new(self.efi_runtime_services.load(Ordering::Relaxed)) }
    }
}

impl Debug for StandardRuntimeServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if !self.is_init() {
            return f
                .debug_struct("StandardRuntimeServices")
                .field("efi_runtime_services", &"Not Initialized")
                .finish();
        }

        f.debug_struct("StandardRuntimeServices")
            .field("get_variable", &(self.efi_runtime_services().get_variable))
            .field("get_next_variable_name", &(self.efi_runtime_services().get_next_variable_name))
            .field("set_variable", &(self.efi_runtime_services().set_variable))
            .finish()
    }
}

/// Returns true if `name` carries a NUL terminator somewhere within the slice.
fn is_nul_terminated(name: &[u16]) -> bool {
    name.iter().any(|&c| c == 0)
}

#[cfg_attr(any(test, feature = "mockall"), automock)]
#[allow(clippy::needless_lifetimes)] //https://github.com/rust-lang/rust-clippy/issues/6622
/// Interface for Rust-friendly wrappers of the UEFI variable runtime services
pub trait RuntimeServices {
    /// Reads a UEFI variable into a caller-provided buffer.
    ///
    /// Returns a tuple of (bytes written, attributes). A buffer that is too small is reported as
    /// `BUFFER_TOO_SMALL` without touching its contents.
    fn get_variable_into(
        &self,
        name: &[u16],
        namespace: &efi::Guid,
        data: &mut [u8],
    ) -> Result<(usize, u32), efi::Status> {
        if !is_nul_terminated(name) {
            debug_assert!(false, "Name passed into get_variable_into is not null-terminated.");
            return Err(efi::Status::INVALID_PARAMETER);
        }

        let mut name_vec = name.to_vec();

        match unsafe { self.get_variable_unchecked(name_vec.as_mut_slice(), namespace, Some(data)) } {
            GetVariableStatus::Success { data_size, attributes } => Ok((data_size, attributes)),
            GetVariableStatus::BufferTooSmall { .. } => Err(efi::Status::BUFFER_TOO_SMALL),
            GetVariableStatus::Error(e) => Err(e),
        }
    }

    /// Helper function to get a UEFI variable's size and attributes
    ///
    /// Probes the store with a zero-sized buffer. A variable that exists is reported by the firmware as
    /// `BUFFER_TOO_SMALL` along with its size. Any other answer, `Success` included, means there is no data to read
    /// and is reported as an error (`NOT_FOUND` for `Success`).
    fn get_variable_size_and_attributes(
        &self,
        name: &[u16],
        namespace: &efi::Guid,
    ) -> Result<(usize, u32), efi::Status> {
        if !is_nul_terminated(name) {
            debug_assert!(false, "Name passed into get_variable_size_and_attributes is not null-terminated.");
            return Err(efi::Status::INVALID_PARAMETER);
        }

        let mut name_vec = name.to_vec();

        unsafe {
            match self.get_variable_unchecked(name_vec.as_mut_slice(), namespace, None) {
                GetVariableStatus::BufferTooSmall { data_size, attributes } => Ok((data_size, attributes)),
                GetVariableStatus::Error(e) => Err(e),
                GetVariableStatus::Success { .. } => Err(efi::Status::NOT_FOUND),
            }
        }
    }

    /// Gets a UEFI variable
    ///
    /// A `None` data buffer is passed to the firmware as a NULL pointer with a size of zero.
    ///
    /// # Safety
    ///
    /// Ensure name is null-terminated
    unsafe fn get_variable_unchecked<'a>(
        &self,
        name: &mut [u16],
        namespace: &efi::Guid,
        data: Option<&'a mut [u8]>,
    ) -> GetVariableStatus;
}

impl RuntimeServices for StandardRuntimeServices {
    unsafe fn get_variable_unchecked(
        &self,
        name: &mut [u16],
        namespace: &efi::Guid,
        data: Option<&mut [u8]>,
    ) -> GetVariableStatus {
        let get_variable = self.efi_runtime_services().get_variable;
        if get_variable as usize == 0 {
            debug_assert!(false, "GetVariable has not initialized in the Runtime Services Table.");
            return GetVariableStatus::Error(efi::Status::NOT_FOUND);
        }

        let mut data_size: usize = match data {
            Some(ref d) => d.len(),
            None => 0,
        };
        let mut attributes: u32 = 0;

        let status = get_variable(
            name.as_mut_ptr(),
            namespace as *const _ as *mut _,
            ptr::addr_of_mut!(attributes),
            ptr::addr_of_mut!(data_size),
            match data {
                Some(d) => d.as_mut_ptr() as *mut c_void,
                None => ptr::null_mut(),
            },
        );

        if status == efi::Status::BUFFER_TOO_SMALL {
            return GetVariableStatus::BufferTooSmall { data_size, attributes };
        } else if status.is_error() {
            return GetVariableStatus::Error(status);
        }

        GetVariableStatus::Success { data_size, attributes }
    }
}

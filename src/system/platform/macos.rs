// The mach host APIs are flagged deprecated in libc in favour of the mach2
// crate; the bindings are still the ones sysinfo itself links against.
#![allow(deprecated)]

use std::ffi::CStr;
use std::mem::{self, MaybeUninit};
use std::ptr;

use super::PlatformProbe;
use crate::system::snapshot::{CpuTicks, SwapSnapshot, VmCounters};

pub struct Platform;

impl PlatformProbe for Platform {
    fn vm_counters() -> Option<VmCounters> {
        let mut stats = MaybeUninit::<libc::vm_statistics64>::zeroed();
        let mut count = (mem::size_of::<libc::vm_statistics64>()
            / mem::size_of::<libc::integer_t>()) as libc::mach_msg_type_number_t;

        // SAFETY: `stats` is large enough for `count` integers and the kernel
        // writes at most that many.
        let kr = unsafe {
            libc::host_statistics64(
                libc::mach_host_self(),
                libc::HOST_VM_INFO64,
                stats.as_mut_ptr().cast(),
                &mut count,
            )
        };
        if kr != libc::KERN_SUCCESS {
            return None;
        }
        // SAFETY: KERN_SUCCESS means the struct was filled in.
        let stats = unsafe { stats.assume_init() };

        // SAFETY: sysconf has no preconditions.
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if page_size <= 0 {
            return None;
        }

        Some(VmCounters {
            page_size: page_size as u64,
            free: u64::from(stats.free_count),
            active: u64::from(stats.active_count),
            inactive: u64::from(stats.inactive_count),
            wired: u64::from(stats.wire_count),
            compressed: u64::from(stats.compressor_page_count),
            purgeable: u64::from(stats.purgeable_count),
            speculative: u64::from(stats.speculative_count),
            internal: u64::from(stats.internal_page_count),
            external: u64::from(stats.external_page_count),
        })
    }

    fn total_memory() -> Option<u64> {
        sysctl_value::<u64>(c"hw.memsize")
    }

    fn swap_usage() -> Option<SwapSnapshot> {
        let usage = sysctl_value::<libc::xsw_usage>(c"vm.swapusage")?;
        Some(SwapSnapshot {
            used: usage.xsu_used,
            total: usage.xsu_total,
        })
    }

    fn pressure_level() -> Option<i32> {
        sysctl_value::<libc::c_int>(c"kern.memorystatus_vm_pressure_level")
    }

    fn cpu_ticks() -> Option<CpuTicks> {
        ProcessorLoadInfo::query().map(|info| info.sum_ticks())
    }

    fn load_average() -> Option<[f64; 3]> {
        super::getloadavg3()
    }

    fn gpu_utilization() -> Option<f64> {
        iokit::accelerator_utilization()
    }

    fn thermal_level() -> Option<u64> {
        notify::thermal_pressure_level()
    }

    fn hardware_model() -> Option<String> {
        sysctl_string(c"hw.model")
    }
}

fn sysctl_value<T: Copy>(name: &CStr) -> Option<T> {
    let mut value = MaybeUninit::<T>::zeroed();
    let mut size = mem::size_of::<T>();
    // SAFETY: the output buffer is exactly `size` bytes.
    let rc = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            value.as_mut_ptr().cast(),
            &mut size,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 || size != mem::size_of::<T>() {
        return None;
    }
    // SAFETY: the kernel filled all `size_of::<T>()` bytes.
    Some(unsafe { value.assume_init() })
}

fn sysctl_string(name: &CStr) -> Option<String> {
    let mut size = 0usize;
    // SAFETY: a null output buffer asks only for the required length.
    let rc = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            ptr::null_mut(),
            &mut size,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 || size == 0 {
        return None;
    }

    let mut buf = vec![0u8; size];
    // SAFETY: `buf` holds `size` writable bytes.
    let rc = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            buf.as_mut_ptr().cast(),
            &mut size,
            ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return None;
    }
    buf.truncate(size);
    let text = String::from_utf8_lossy(&buf);
    let text = text.trim_end_matches('\0').trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Per-core tick buffer allocated by `host_processor_info`. Freed on drop.
struct ProcessorLoadInfo {
    info: libc::processor_info_array_t,
    info_count: libc::mach_msg_type_number_t,
    cpu_count: libc::natural_t,
}

impl ProcessorLoadInfo {
    fn query() -> Option<Self> {
        let mut cpu_count: libc::natural_t = 0;
        let mut info: libc::processor_info_array_t = ptr::null_mut();
        let mut info_count: libc::mach_msg_type_number_t = 0;

        // SAFETY: all out-pointers are valid; on success the kernel hands us
        // a buffer that must be released with vm_deallocate.
        let kr = unsafe {
            libc::host_processor_info(
                libc::mach_host_self(),
                libc::PROCESSOR_CPU_LOAD_INFO,
                &mut cpu_count,
                &mut info,
                &mut info_count,
            )
        };
        if kr != libc::KERN_SUCCESS || info.is_null() {
            return None;
        }
        Some(ProcessorLoadInfo {
            info,
            info_count,
            cpu_count,
        })
    }

    fn sum_ticks(&self) -> CpuTicks {
        // SAFETY: the kernel returned `info_count` integers at `info`.
        let raw = unsafe { std::slice::from_raw_parts(self.info, self.info_count as usize) };
        let states = libc::CPU_STATE_MAX as usize;
        let tick = |core: &[libc::integer_t], state: libc::c_int| -> u64 {
            // Tick counters are unsigned 32-bit values stored in integer_t.
            u64::from(core[state as usize] as u32)
        };

        raw.chunks_exact(states)
            .take(self.cpu_count as usize)
            .fold(CpuTicks::default(), |mut acc, core| {
                acc.user += tick(core, libc::CPU_STATE_USER);
                acc.system += tick(core, libc::CPU_STATE_SYSTEM);
                acc.idle += tick(core, libc::CPU_STATE_IDLE);
                acc.nice += tick(core, libc::CPU_STATE_NICE);
                acc
            })
    }
}

impl Drop for ProcessorLoadInfo {
    fn drop(&mut self) {
        let bytes = self.info_count as usize * mem::size_of::<libc::integer_t>();
        // SAFETY: `info` came from host_processor_info and is released once.
        unsafe {
            libc::vm_deallocate(libc::mach_task_self(), self.info as libc::vm_address_t, bytes);
        }
    }
}

/// IOKit accelerator probing for GPU utilization.
mod iokit {
    use std::ffi::{CStr, c_char, c_void};

    use crate::system::platform::gpu_utilization_from;

    type IOReturn = i32;

    #[allow(non_camel_case_types)]
    type mach_port_t = u32;
    #[allow(non_camel_case_types)]
    type io_object_t = u32;

    type CFTypeRef = *const c_void;
    type CFStringRef = *const c_void;
    type CFAllocatorRef = *const c_void;
    type CFDictionaryRef = *const c_void;
    type CFMutableDictionaryRef = *mut c_void;
    type CFTypeID = usize;

    const K_IO_MAIN_PORT_DEFAULT: mach_port_t = 0;
    const K_IO_RETURN_SUCCESS: IOReturn = 0;
    const K_CF_ALLOCATOR_DEFAULT: CFAllocatorRef = std::ptr::null();
    const K_CF_STRING_ENCODING_UTF8: u32 = 0x0800_0100;
    const K_CF_NUMBER_FLOAT64_TYPE: isize = 6;

    const PERFORMANCE_STATISTICS: &CStr = c"PerformanceStatistics";

    #[link(name = "IOKit", kind = "framework")]
    unsafe extern "C" {
        fn IOServiceMatching(name: *const c_char) -> CFMutableDictionaryRef;
        fn IOServiceGetMatchingServices(
            main_port: mach_port_t,
            matching: CFDictionaryRef,
            existing: *mut io_object_t,
        ) -> IOReturn;
        fn IOIteratorNext(iterator: io_object_t) -> io_object_t;
        fn IORegistryEntryCreateCFProperty(
            entry: io_object_t,
            key: CFStringRef,
            allocator: CFAllocatorRef,
            options: u32,
        ) -> CFTypeRef;
        fn IOObjectRelease(object: io_object_t) -> IOReturn;
    }

    #[link(name = "CoreFoundation", kind = "framework")]
    unsafe extern "C" {
        fn CFRelease(cf: CFTypeRef);
        fn CFGetTypeID(cf: CFTypeRef) -> CFTypeID;
        fn CFDictionaryGetTypeID() -> CFTypeID;
        fn CFNumberGetTypeID() -> CFTypeID;
        fn CFStringCreateWithCString(
            alloc: CFAllocatorRef,
            c_str: *const c_char,
            encoding: u32,
        ) -> CFStringRef;
        fn CFDictionaryGetValue(dict: CFDictionaryRef, key: CFTypeRef) -> CFTypeRef;
        fn CFNumberGetValue(number: CFTypeRef, the_type: isize, value_ptr: *mut c_void) -> u8;
    }

    /// An IOKit object reference released on drop. Zero means "no object".
    struct IoObject(io_object_t);

    impl Drop for IoObject {
        fn drop(&mut self) {
            if self.0 != 0 {
                // SAFETY: we own exactly one reference to this object.
                unsafe {
                    IOObjectRelease(self.0);
                }
            }
        }
    }

    /// An owned (create-rule) CoreFoundation reference released on drop.
    struct CfOwned(CFTypeRef);

    impl CfOwned {
        fn string(text: &CStr) -> Option<Self> {
            // SAFETY: `text` is a valid NUL-terminated string.
            let s = unsafe {
                CFStringCreateWithCString(
                    K_CF_ALLOCATOR_DEFAULT,
                    text.as_ptr(),
                    K_CF_STRING_ENCODING_UTF8,
                )
            };
            (!s.is_null()).then_some(CfOwned(s))
        }
    }

    impl Drop for CfOwned {
        fn drop(&mut self) {
            if !self.0.is_null() {
                // SAFETY: create-rule object, released once.
                unsafe { CFRelease(self.0) };
            }
        }
    }

    pub fn accelerator_utilization() -> Option<f64> {
        // SAFETY: IOServiceMatching copies the class name into a new dictionary.
        let matching = unsafe { IOServiceMatching(c"IOAccelerator".as_ptr()) };
        if matching.is_null() {
            return None;
        }

        let mut raw_iterator: io_object_t = 0;
        // SAFETY: consumes `matching` even on failure and writes the iterator.
        let kr = unsafe {
            IOServiceGetMatchingServices(K_IO_MAIN_PORT_DEFAULT, matching, &mut raw_iterator)
        };
        if kr != K_IO_RETURN_SUCCESS {
            return None;
        }
        let iterator = IoObject(raw_iterator);
        let stats_key = CfOwned::string(PERFORMANCE_STATISTICS)?;

        loop {
            // SAFETY: `iterator` is a live iterator; 0 signals exhaustion.
            let service = IoObject(unsafe { IOIteratorNext(iterator.0) });
            if service.0 == 0 {
                return None;
            }
            if let Some(pct) = service_utilization(&service, &stats_key) {
                return Some(pct);
            }
        }
    }

    fn service_utilization(service: &IoObject, stats_key: &CfOwned) -> Option<f64> {
        // SAFETY: create-rule copy of the property, owned by the guard.
        let stats = CfOwned(unsafe {
            IORegistryEntryCreateCFProperty(service.0, stats_key.0, K_CF_ALLOCATOR_DEFAULT, 0)
        });
        if stats.0.is_null() {
            return None;
        }
        // SAFETY: type checks on a live CF object.
        if unsafe { CFGetTypeID(stats.0) != CFDictionaryGetTypeID() } {
            return None;
        }

        gpu_utilization_from(|key| dictionary_number(stats.0, key))
    }

    fn dictionary_number(dict: CFDictionaryRef, key: &CStr) -> Option<f64> {
        let key = CfOwned::string(key)?;
        // SAFETY: get-rule lookup; the value is borrowed from `dict`.
        let value = unsafe { CFDictionaryGetValue(dict, key.0) };
        if value.is_null() {
            return None;
        }
        // SAFETY: type check on a live CF object.
        if unsafe { CFGetTypeID(value) != CFNumberGetTypeID() } {
            return None;
        }
        let mut out = 0.0_f64;
        // SAFETY: `out` is a valid f64 destination for kCFNumberFloat64Type.
        unsafe {
            CFNumberGetValue(
                value,
                K_CF_NUMBER_FLOAT64_TYPE,
                (&mut out as *mut f64).cast::<c_void>(),
            );
        }
        Some(out)
    }
}

/// Thermal pressure published through the notify(3) state of
/// `com.apple.system.thermalpressurelevel`.
mod notify {
    use std::ffi::{c_char, c_int};

    const NOTIFY_STATUS_OK: u32 = 0;

    unsafe extern "C" {
        fn notify_register_check(name: *const c_char, out_token: *mut c_int) -> u32;
        fn notify_get_state(token: c_int, state: *mut u64) -> u32;
        fn notify_cancel(token: c_int) -> u32;
    }

    struct Registration(c_int);

    impl Drop for Registration {
        fn drop(&mut self) {
            // SAFETY: token came from a successful notify_register_check.
            unsafe {
                notify_cancel(self.0);
            }
        }
    }

    pub fn thermal_pressure_level() -> Option<u64> {
        let mut token: c_int = 0;
        // SAFETY: valid NUL-terminated name and out-pointer.
        let status = unsafe {
            notify_register_check(c"com.apple.system.thermalpressurelevel".as_ptr(), &mut token)
        };
        if status != NOTIFY_STATUS_OK {
            return None;
        }
        let registration = Registration(token);

        let mut state = 0u64;
        // SAFETY: token is registered; `state` is a valid destination.
        let status = unsafe { notify_get_state(registration.0, &mut state) };
        (status == NOTIFY_STATUS_OK).then_some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vm_counters_are_readable() {
        let counters = Platform::vm_counters().expect("host_statistics64 failed");
        assert!(counters.page_size >= 4096);
        assert!(counters.active > 0);
    }

    #[test]
    fn total_memory_is_readable() {
        assert!(Platform::total_memory().unwrap_or(0) > 0);
    }

    #[test]
    fn cpu_ticks_release_and_repeat() {
        for _ in 0..4 {
            let ticks = Platform::cpu_ticks().expect("host_processor_info failed");
            assert!(ticks.total() > 0);
        }
    }

    #[test]
    fn hardware_model_is_not_empty() {
        if let Some(model) = Platform::hardware_model() {
            assert!(!model.trim().is_empty());
        }
    }
}

//! Build script to embed Windows resource metadata into the executable
//! This sets the application name shown in Task Manager

fn main() {
    #[cfg(windows)]
    {
        let mut res = winresource::WindowsResource::new();

        res.set("ProductName", "Instalador Office Pro");
        res.set("FileDescription", "Instalador Office Pro");
        res.set("InternalName", "OfficeInstaller");
        res.set("OriginalFilename", "office_installer.exe");
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));

        if std::path::Path::new("icon.ico").exists() {
            res.set_icon("icon.ico");
        }

        if let Err(e) = res.compile() {
            eprintln!("Warning: Failed to compile Windows resources: {}", e);
        }
    }
}

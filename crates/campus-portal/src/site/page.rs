/// Every page the website serves. Paths are fixed and take no parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    About,
    Courses,
    Training,
    Blog,
    FeeStructure,
    ApplyNow,
    Login,
    AdminPage,
}

impl Page {
    pub const ALL: [Page; 9] = [
        Page::Home,
        Page::About,
        Page::Courses,
        Page::Training,
        Page::Blog,
        Page::FeeStructure,
        Page::ApplyNow,
        Page::Login,
        Page::AdminPage,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::About => "/about",
            Page::Courses => "/courses",
            Page::Training => "/training",
            Page::Blog => "/blog",
            Page::FeeStructure => "/feeStructure",
            Page::ApplyNow => "/applyNow",
            Page::Login => "/login",
            Page::AdminPage => "/adminPage",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::About => "About Us",
            Page::Courses => "Courses",
            Page::Training => "Training",
            Page::Blog => "Blog",
            Page::FeeStructure => "Fee Structure",
            Page::ApplyNow => "Apply Now",
            Page::Login => "Login",
            Page::AdminPage => "Applications",
        }
    }

    /// Pages linked from the navigation bar.
    pub fn in_navigation(self) -> bool {
        !matches!(self, Page::AdminPage)
    }
}
